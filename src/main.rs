use clap::Parser;
use form_session::cli::commands::{
    cmd_clear, cmd_key, cmd_reset, cmd_set, cmd_show, cmd_submit, cmd_verify,
};
use form_session::cli::config::{Cli, Commands, load_config, log_level};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(log_level(cli.verbose))
        .init();

    let config = load_config(cli.config.as_deref());
    let store = cli.store.as_deref();

    match cli.command {
        Commands::Key { table, view } => {
            cmd_key(table.as_deref(), view.as_deref());
        }
        Commands::Show { form } => {
            cmd_show(&config, store, &form)?;
        }
        Commands::Set { form, field, value } => {
            cmd_set(&config, store, &form, &field, &value)?;
        }
        Commands::Clear { form, field } => {
            cmd_clear(&config, store, &form, &field)?;
        }
        Commands::Verify { form } => {
            if !cmd_verify(&config, store, &form)? {
                std::process::exit(1);
            }
        }
        Commands::Submit { form, endpoint } => {
            let submitted = cmd_submit(&config, store, &form, endpoint.as_deref(), cli.verbose)?;
            if !submitted {
                std::process::exit(1);
            }
        }
        Commands::Reset { form } => {
            cmd_reset(&config, store, &form)?;
        }
    }

    Ok(())
}
