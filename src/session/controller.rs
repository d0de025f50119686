use log::{debug, info};
use serde_json::Value;

use crate::{
    draft::{medium::StorageMedium, store::DraftStore, values::DraftValues},
    identity::storage_key::{FormIdentity, StorageKey},
    schema::field_model::{FieldDescriptor, visible_fields},
    sched::{
        debounce::Debounce,
        timer::{Scheduler, TimerId},
    },
    session::{
        error::SessionError,
        notify::{NoticeLevel, Notification, Notifier},
        session_model::{
            SessionOptions, SessionTask, SubmissionState, SubmitOutcome, TaskKind, UiEffect,
        },
        submit::Submitter,
    },
    trace::{logger::TraceLogger, trace::SessionTrace},
    validation::errors::{ValidationErrors, Verification},
};

/// One mounted form: draft values, validation flags and the submit lifecycle.
///
/// All input arrives as discrete calls (edit, submit, reset, clock advance)
/// processed one at a time. The write-through to the durable store and the
/// post-submit reset are single-shot timers on the session's own scheduler;
/// the host drives them with [`FormSession::advance`] or [`FormSession::settle`].
pub struct FormSession<M: StorageMedium, S: Submitter, N: Notifier> {
    identity: FormIdentity,
    key: StorageKey,
    fields: Vec<FieldDescriptor>,

    drafts: DraftValues,
    errors: ValidationErrors,
    state: SubmissionState,

    store: DraftStore<M>,
    submitter: S,
    notifier: N,

    scheduler: Scheduler<SessionTask>,
    flush: Debounce,
    settle: Option<TimerId>,
    generation: u64,
    disposed: bool,

    options: SessionOptions,
    effects: Vec<UiEffect>,
    tracer: TraceLogger,
}

impl<M: StorageMedium, S: Submitter, N: Notifier> FormSession<M, S, N> {
    /// Mount a form for `identity`, hydrating its draft from the store.
    /// Computed and lookup fields are dropped from `fields`.
    pub fn mount(
        store: DraftStore<M>,
        submitter: S,
        notifier: N,
        identity: FormIdentity,
        fields: &[FieldDescriptor],
        options: SessionOptions,
    ) -> Self {
        let key = identity.storage_key();
        let drafts = store.entry(&key);

        let session = Self {
            identity,
            key,
            fields: visible_fields(fields),
            drafts,
            errors: ValidationErrors::new(),
            state: SubmissionState::Idle,
            store,
            submitter,
            notifier,
            scheduler: Scheduler::new(),
            flush: Debounce::new(),
            settle: None,
            generation: 0,
            disposed: false,
            options,
            effects: Vec::new(),
            tracer: TraceLogger::disabled(),
        };

        debug!("mounted form {} with {} draft values", session.key, session.drafts.len());
        session
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self.trace(SessionTrace::now(&self.key, self.state, "mount").with_draft(&self.drafts));
        self
    }

    // ---- Accessors ----

    pub fn identity(&self) -> &FormIdentity {
        &self.identity
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn drafts(&self) -> &DraftValues {
        &self.drafts
    }

    pub fn value(&self, field_id: &str) -> Option<&Value> {
        self.drafts.get(field_id)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Controls accept input only while idle.
    pub fn is_interactive(&self) -> bool {
        !self.disposed && self.state == SubmissionState::Idle
    }

    pub fn store(&self) -> &DraftStore<M> {
        &self.store
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn take_effects(&mut self) -> Vec<UiEffect> {
        std::mem::take(&mut self.effects)
    }

    // ---- Field edits ----

    /// Store a value for a visible field. `null` removes the entry. A
    /// non-blank value clears that field's error flag immediately.
    pub fn set_field(&mut self, field_id: &str, value: Value) -> Result<(), SessionError> {
        self.ensure_editable()?;
        if !self.fields.iter().any(|f| f.id == field_id) {
            return Err(SessionError::UnknownField(field_id.to_string()));
        }

        let cleared = self.errors.clear_if_corrected(field_id, &value);
        let removed = value.is_null();
        self.drafts.set(field_id, value);
        self.schedule_flush();

        let name = if removed { "clear_field" } else { "set_field" };
        let mut event = SessionTrace::now(&self.key, self.state, name)
            .with_field(field_id)
            .with_draft(&self.drafts);
        if cleared {
            event = event.with_detail("error_cleared");
        }
        self.trace(event);
        Ok(())
    }

    pub fn clear_field(&mut self, field_id: &str) -> Result<(), SessionError> {
        self.set_field(field_id, Value::Null)
    }

    // ---- Validation ----

    /// Recompute the error set from scratch against the current draft.
    pub fn verify(&mut self) -> Verification {
        let verification = self.errors.recompute(&self.fields, &self.drafts);
        let mut event = SessionTrace::now(&self.key, self.state, "verify")
            .with_detail(format!("invalid={}", self.errors.len()));
        if let Some(first) = &verification.first_failing {
            event = event.with_field(first);
        }
        self.trace(event);
        verification
    }

    // ---- Submit lifecycle ----

    /// Verify, then hand a snapshot to the submitter. On success the session
    /// stays `Submitting` until the settle delay elapses and the reset runs.
    pub fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        self.ensure_editable()?;

        let verification = self.verify();
        if !verification.ok {
            if let Some(first) = &verification.first_failing {
                self.effects.push(UiEffect::FocusField(first.clone()));
            }
            info!("submit blocked: {} required field(s) empty", self.errors.len());
            return Ok(SubmitOutcome::Invalid {
                first_failing: verification.first_failing,
            });
        }

        self.state = SubmissionState::Submitting;
        self.effects.push(UiEffect::SetInteractive(false));
        self.trace(SessionTrace::now(&self.key, self.state, "submit").with_draft(&self.drafts));

        let snapshot = self.drafts.snapshot();
        match self.submitter.submit(&snapshot) {
            Ok(()) => {
                let task = self.task(TaskKind::SettleSubmit);
                let delay = self.options.timing.settle_delay_ms;
                self.settle = Some(self.scheduler.schedule(delay, task));
                Ok(SubmitOutcome::Submitted {
                    values: self.drafts.clone(),
                })
            }
            Err(e) => {
                info!("submit rejected for {}: {}", self.key, e);
                self.state = SubmissionState::Idle;
                self.effects.push(UiEffect::SetInteractive(true));
                self.notifier.notify(Notification {
                    level: NoticeLevel::Error,
                    title: self.options.notices.error_title.clone(),
                    message: Some(e.to_string()),
                    duration_ms: self.options.notices.duration_ms,
                });
                self.trace(
                    SessionTrace::now(&self.key, self.state, "submit_rejected").with_detail(&e),
                );
                Ok(SubmitOutcome::Rejected(e))
            }
        }
    }

    /// Discard the draft in memory and in the store without submitting.
    /// Cancels a pending post-submit reset, since this one supersedes it.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.disposed {
            return Err(SessionError::Disposed);
        }
        if let Some(id) = self.settle.take() {
            self.scheduler.cancel(id);
        }
        self.clear_session();
        self.trace(SessionTrace::now(&self.key, self.state, "reset"));
        Ok(())
    }

    // ---- Identity changes and teardown ----

    /// Point the session at another (table, view) pair, e.g. once the view
    /// finishes loading. Outstanding work for the old key completes now and
    /// anything still scheduled for it is ignored when it fires.
    pub fn rebind(
        &mut self,
        identity: FormIdentity,
        fields: &[FieldDescriptor],
    ) -> Result<(), SessionError> {
        if self.disposed {
            return Err(SessionError::Disposed);
        }
        self.fields = visible_fields(fields);
        let key = identity.storage_key();
        if key == self.key {
            self.identity = identity;
            self.errors.retain_required(&self.fields);
            return Ok(());
        }

        self.retire_generation(true);

        debug!("rebinding form {} -> {}", self.key, key);
        self.identity = identity;
        self.key = key;
        self.drafts = self.store.entry(&self.key);
        self.errors.clear();
        self.state = SubmissionState::Idle;
        self.trace(SessionTrace::now(&self.key, self.state, "rebind").with_draft(&self.drafts));
        Ok(())
    }

    /// Tear the session down. A pending write is flushed and a settling submit
    /// has its durable entry cleared now; no timer fires afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.retire_generation(false);
        self.scheduler.cancel_all();
        self.disposed = true;
        self.trace(SessionTrace::now(&self.key, self.state, "dispose"));
    }

    // ---- Clock ----

    /// Move the session clock forward and run whatever fell due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.scheduler.advance(elapsed_ms);
        while let Some((id, task)) = self.scheduler.pop_due() {
            self.run_task(id, task);
        }
    }

    /// Run every pending timer, jumping the clock as needed.
    pub fn settle(&mut self) {
        while let Some((id, task)) = self.scheduler.pop_next() {
            self.run_task(id, task);
        }
    }

    // ---- Internals ----

    fn ensure_editable(&self) -> Result<(), SessionError> {
        if self.disposed {
            return Err(SessionError::Disposed);
        }
        if self.state == SubmissionState::Submitting {
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    fn task(&self, kind: TaskKind) -> SessionTask {
        SessionTask {
            kind,
            key: self.key.clone(),
            generation: self.generation,
        }
    }

    fn schedule_flush(&mut self) {
        let task = self.task(TaskKind::FlushDraft);
        self.flush
            .arm(&mut self.scheduler, self.options.timing.debounce_ms, task);
    }

    fn run_task(&mut self, id: TimerId, task: SessionTask) {
        if task.generation != self.generation || task.key != self.key {
            debug!("dropping stale {:?} for {}", task.kind, task.key);
            return;
        }

        match task.kind {
            TaskKind::FlushDraft => {
                self.flush.fired(id);
                self.store.put_entry(&self.key, &self.drafts);
                self.trace(
                    SessionTrace::now(&self.key, self.state, "flush").with_draft(&self.drafts),
                );
            }
            TaskKind::SettleSubmit => {
                self.settle = None;
                self.finish_submit();
            }
        }
    }

    fn finish_submit(&mut self) {
        self.clear_session();
        self.effects.push(UiEffect::ScrollToTop);
        self.notifier.notify(Notification {
            level: NoticeLevel::Success,
            title: self.options.notices.success_title.clone(),
            message: self.options.notices.success_message.clone(),
            duration_ms: self.options.notices.duration_ms,
        });
        info!("form {} submitted and reset", self.key);
        self.trace(SessionTrace::now(&self.key, self.state, "submit_settled"));
    }

    /// Memory, error flags and durable entry all go; busy flag drops.
    fn clear_session(&mut self) {
        self.flush.disarm(&mut self.scheduler);
        self.drafts.reset();
        self.errors.clear();
        self.store.remove_entry(&self.key);
        if self.state == SubmissionState::Submitting {
            self.effects.push(UiEffect::SetInteractive(true));
        }
        self.state = SubmissionState::Idle;
    }

    /// Complete outstanding work for the current key and bump the generation
    /// so timers scheduled under it are ignored.
    fn retire_generation(&mut self, notify_settled: bool) {
        if let Some(id) = self.settle.take() {
            self.scheduler.cancel(id);
            if notify_settled {
                self.finish_submit();
            } else {
                self.clear_session();
            }
        } else if self.flush.disarm(&mut self.scheduler) {
            self.store.put_entry(&self.key, &self.drafts);
        }
        self.generation += 1;
    }

    fn trace(&self, event: SessionTrace) {
        self.tracer.log(&event);
    }
}
