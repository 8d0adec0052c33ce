use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use admin::detail::{CriteriaDetail, RoundDetail, UserDetail};
use admin::forms::{CriteriaDraft, CriteriaForm, RoundForm, TeamDraft, TeamForm};
use admin::smoke::{self, DockerCli, SmokeConfig};
use admin::{AdminState, SubmitOutcome};
use common::{CriteriaId, RoundId, Team, TeamId, UserId};

use crate::cli::{Command, CriteriaCommand, RoundCommand, TeamCommand, UserCommand};
use crate::draft::{self, RoundFile};
use crate::output::{heading, print_field_errors};

/// Run one command. Returns the process exit code.
pub(crate) async fn dispatch(
    command: Command,
    state: &AdminState,
    smoke_config: &SmokeConfig,
) -> Result<i32> {
    match command {
        Command::Smoke => run_smoke(smoke_config).await,
        Command::Criteria(cmd) => criteria(cmd, state).await,
        Command::Round(cmd) => round(cmd, state).await,
        Command::Team(cmd) => team(cmd, state).await,
        Command::User(UserCommand::Show { id }) => {
            let user = state
                .api
                .get_user(&UserId::new(id.as_str()))
                .await
                .with_context(|| format!("Failed to fetch user {id}"))?;
            println!("{}", UserDetail::from(&user));
            Ok(0)
        }
    }
}

async fn run_smoke(config: &SmokeConfig) -> Result<i32> {
    let lister = DockerCli::new(config.docker_bin.as_str());
    let report = smoke::run(config, &lister)
        .await
        .context("Smoke test could not run")?;
    println!("{}", heading("Smoke test"));
    println!("{report}");
    Ok(report.exit_code())
}

async fn criteria(cmd: CriteriaCommand, state: &AdminState) -> Result<i32> {
    match cmd {
        CriteriaCommand::Create { file } => {
            let mut form = CriteriaForm::new(state.rules.clone());
            form.set_draft(draft::load::<CriteriaDraft>(&file)?);
            Ok(finish(form.submit(state).await, |c| {
                println!("{}", CriteriaDetail::from(c))
            }))
        }
        CriteriaCommand::Update { id, file } => {
            let existing = state
                .api
                .get_criteria(&CriteriaId::new(id.as_str()))
                .await
                .with_context(|| format!("Failed to fetch criteria {id}"))?;
            let mut form = CriteriaForm::edit(state.rules.clone(), &existing);
            form.set_draft(draft::load::<CriteriaDraft>(&file)?);
            Ok(finish(form.submit(state).await, |c| {
                println!("{}", CriteriaDetail::from(c))
            }))
        }
        CriteriaCommand::Show { id } => {
            let c = state
                .api
                .get_criteria(&CriteriaId::new(id.as_str()))
                .await
                .with_context(|| format!("Failed to fetch criteria {id}"))?;
            println!("{}", CriteriaDetail::from(&c));
            Ok(0)
        }
    }
}

async fn round(cmd: RoundCommand, state: &AdminState) -> Result<i32> {
    match cmd {
        RoundCommand::Create { file } => {
            let file: RoundFile = draft::load(&file)?;
            let mut form = RoundForm::new(state.rules.clone());
            load_and_select(&mut form, state, &file.criteria, false).await?;
            form.set_draft(file.draft);
            Ok(finish(form.submit(state).await, |r| {
                println!("{}", RoundDetail::from(r))
            }))
        }
        RoundCommand::Update { id, file } => {
            let file: RoundFile = draft::load(&file)?;
            let existing = state
                .api
                .get_round(&RoundId::new(id.as_str()))
                .await
                .with_context(|| format!("Failed to fetch round {id}"))?;
            let mut form = RoundForm::edit(state.rules.clone(), &existing);
            load_and_select(&mut form, state, &file.criteria, true).await?;
            form.set_draft(file.draft);
            Ok(finish(form.submit(state).await, |r| {
                println!("{}", RoundDetail::from(r))
            }))
        }
        RoundCommand::Show { id } => {
            let r = state
                .api
                .get_round(&RoundId::new(id.as_str()))
                .await
                .with_context(|| format!("Failed to fetch round {id}"))?;
            println!("{}", RoundDetail::from(&r));
            Ok(0)
        }
    }
}

/// Load the active criteria and select `ids`. With `replace`, a non-empty
/// `ids` replaces the existing selection.
async fn load_and_select(
    form: &mut RoundForm,
    state: &AdminState,
    ids: &[CriteriaId],
    replace: bool,
) -> Result<()> {
    let available = form
        .load_criteria(state)
        .await
        .context("Failed to load criteria")?;
    debug!(available, "Active criteria loaded");

    if ids.is_empty() {
        return Ok(());
    }
    if replace {
        form.clear_selection();
    }
    let missing = form.select_ids(ids);
    if !missing.is_empty() {
        let missing: Vec<_> = missing.iter().map(CriteriaId::as_str).collect();
        bail!("Unknown or inactive criteria: {}", missing.join(", "));
    }
    Ok(())
}

async fn team(cmd: TeamCommand, state: &AdminState) -> Result<i32> {
    let (mut form, file) = match cmd {
        TeamCommand::Create { file } => (TeamForm::new(state.rules.clone()), file),
        TeamCommand::Update { id, file } => {
            let existing = state
                .api
                .get_team(&TeamId::new(id.as_str()))
                .await
                .with_context(|| format!("Failed to fetch team {id}"))?;
            (TeamForm::edit(state.rules.clone(), &existing), file)
        }
    };
    form.set_draft(draft::load::<TeamDraft>(&file)?);
    Ok(finish(form.submit(state).await, print_team))
}

fn print_team(team: &Team) {
    println!(
        "Team #{} {} ({} members)",
        team.team_number,
        team.team_name,
        team.members.len()
    );
    println!("{}", team.project_title);
    for m in &team.members {
        println!("  - {} [{}] {} <{}>", m.name, m.role, m.student_number, m.email);
    }
}

/// Print the outcome and map it to an exit code. Toasts for rejected and
/// failed submits have already been shown by the notifier.
fn finish<T>(outcome: SubmitOutcome<T>, show: impl FnOnce(&T)) -> i32 {
    match outcome {
        SubmitOutcome::Saved(entity) => {
            show(&entity);
            0
        }
        SubmitOutcome::Invalid(errors) => {
            print_field_errors(&errors);
            2
        }
        SubmitOutcome::Rejected(reason) | SubmitOutcome::Failed(reason) => {
            info!(%reason, "Submit did not complete");
            1
        }
        SubmitOutcome::Busy => 1,
    }
}
