pub mod storage_key;
