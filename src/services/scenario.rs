use std::fmt;

use tracing::{info, warn};

use crate::client::{Exchange, RequestClient};
use crate::config::Config;
use crate::domains::envelope::ServiceTag;
use crate::domains::record::DisplayRecord;
use crate::error::{ChatwireError, Result};
use crate::services::interpreter::{interpret_exchange, StatusPolicy};
use crate::services::sampling::{iterate_all, Sampler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoggingIn,
    ListingUsers,
    CreatingChannels,
    ListingChannels,
    Done,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LoggingIn => "logging-in",
            Self::ListingUsers => "listing-users",
            Self::CreatingChannels => "creating-channels",
            Self::ListingChannels => "listing-channels",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// One login as `client-go`, one channel `geral`.
    Client,
    /// One login as `bot123`, one channel `bot-zone`.
    Bot,
    /// Sampled logins from the configured pool, every configured channel.
    Load,
}

/// What a run sends: login identities first, then channels to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub logins: Vec<String>,
    pub channels: Vec<String>,
}

impl Plan {
    pub fn fixed<U, C>(logins: U, channels: C) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            logins: logins.into_iter().map(Into::into).collect(),
            channels: channels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn sampled<R: rand::Rng>(config: &Config, sampler: &mut Sampler<R>) -> Self {
        let logins = match config.logins {
            Some(count) => sampler.sample_subset(&config.users, count),
            None => sampler.sample_up_to(&config.users, config.max_logins),
        };
        Self {
            logins,
            channels: iterate_all(&config.channels).cloned().collect(),
        }
    }

    pub fn from_preset<R: rand::Rng>(
        preset: Preset,
        config: &Config,
        sampler: &mut Sampler<R>,
    ) -> Self {
        match preset {
            Preset::Client => Self::fixed(["client-go"], ["geral"]),
            Preset::Bot => Self::fixed(["bot123"], ["bot-zone"]),
            Preset::Load => Self::sampled(config, sampler),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub phase: Phase,
    pub service: ServiceTag,
    pub record: DisplayRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub phase: Phase,
    pub steps: Vec<StepOutcome>,
}

impl RunReport {
    pub fn successes(&self) -> usize {
        self.steps.iter().filter(|step| step.record.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|step| step.record.is_failure()).count()
    }
}

/// Drives one run through
/// `Idle -> LoggingIn -> ListingUsers -> CreatingChannels -> ListingChannels -> Done`.
///
/// Any transport-layer error stops the run at the failing call. A reply
/// whose status is not a success is recorded and the run carries on.
pub struct Scenario {
    policy: StatusPolicy,
}

impl Scenario {
    pub fn new(policy: StatusPolicy) -> Self {
        Self { policy }
    }

    pub async fn run(&self, client: RequestClient, plan: &Plan) -> Result<RunReport> {
        self.run_with(client, plan, |_| {}).await
    }

    /// `observer` sees each outcome as soon as its reply is interpreted.
    /// The channel is closed before returning, whether or not the run failed.
    /// A failed close is only logged; it never replaces the run's outcome.
    pub async fn run_with<F>(
        &self,
        mut client: RequestClient,
        plan: &Plan,
        mut observer: F,
    ) -> Result<RunReport>
    where
        F: FnMut(&StepOutcome) + Send,
    {
        let outcome = self.drive(&mut client, plan, &mut observer).await;
        let closed = client.close().await;
        match (outcome, closed) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(report), Err(close_err)) => {
                warn!(error = %close_err, "closing channel after completed run");
                Ok(report)
            }
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!(error = %close_err, "closing channel after failed run");
                Err(e)
            }
        }
    }

    async fn drive<F>(
        &self,
        client: &mut RequestClient,
        plan: &Plan,
        observer: &mut F,
    ) -> Result<RunReport>
    where
        F: FnMut(&StepOutcome) + Send,
    {
        let mut report = RunReport {
            phase: Phase::Idle,
            steps: Vec::new(),
        };

        self.enter(&mut report, Phase::LoggingIn);
        for user in &plan.logins {
            let exchange = client
                .login(user)
                .await
                .map_err(|e| call_error(Phase::LoggingIn, &ServiceTag::Login, Some(user), e))?;
            self.record(&mut report, exchange, observer);
        }

        self.enter(&mut report, Phase::ListingUsers);
        let exchange = client
            .users()
            .await
            .map_err(|e| call_error(Phase::ListingUsers, &ServiceTag::Users, None, e))?;
        self.record(&mut report, exchange, observer);

        self.enter(&mut report, Phase::CreatingChannels);
        for channel in &plan.channels {
            let exchange = client.create_channel(channel).await.map_err(|e| {
                call_error(Phase::CreatingChannels, &ServiceTag::Channel, Some(channel), e)
            })?;
            self.record(&mut report, exchange, observer);
        }

        self.enter(&mut report, Phase::ListingChannels);
        let exchange = client
            .channels()
            .await
            .map_err(|e| call_error(Phase::ListingChannels, &ServiceTag::Channels, None, e))?;
        self.record(&mut report, exchange, observer);

        self.enter(&mut report, Phase::Done);
        Ok(report)
    }

    fn enter(&self, report: &mut RunReport, phase: Phase) {
        info!(from = %report.phase, to = %phase, "phase");
        report.phase = phase;
    }

    fn record<F>(&self, report: &mut RunReport, exchange: Exchange, observer: &mut F)
    where
        F: FnMut(&StepOutcome),
    {
        let record = interpret_exchange(&exchange, &self.policy);
        if record.is_failure() {
            warn!(service = %exchange.request.service, %record, "rejected");
        }
        let step = StepOutcome {
            phase: report.phase,
            service: exchange.request.service,
            record,
        };
        observer(&step);
        report.steps.push(step);
    }
}

fn call_error(
    phase: Phase,
    service: &ServiceTag,
    subject: Option<&String>,
    source: ChatwireError,
) -> ChatwireError {
    let target = match subject {
        Some(subject) => format!("{service} '{subject}'"),
        None => service.to_string(),
    };
    ChatwireError::Call {
        phase: phase.to_string(),
        target,
        source: Box::new(source),
    }
}
