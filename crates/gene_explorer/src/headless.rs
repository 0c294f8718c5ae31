//! `gene_explorer plot`: fill the form from command-line flags and request
//! one plot, without the terminal UI.

use std::cell::RefCell;

use clap::Args;
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use gene_explorer_core::services::{Collaborators, FailureReporter, Remote, drive};
use gene_explorer_core::{
    CycleOutcome, Demographic, ExplorerController, Facet, FieldId, ResponseVariable,
};

use crate::labkey::LabKeyClient;
use crate::settings::Settings;

#[derive(Args, Debug, Clone, Default)]
pub struct PlotArgs {
    /// Timepoint label, e.g. "7 Days"
    #[arg(long)]
    pub timepoint: String,

    /// Cohort to include (repeatable)
    #[arg(long = "cohort", required = true)]
    pub cohorts: Vec<String>,

    /// Gene symbol to plot (repeatable)
    #[arg(long = "gene", required = true)]
    pub genes: Vec<String>,

    /// Response variable
    #[arg(long, default_value = "HAI")]
    pub response: String,

    /// Normalize expression to baseline
    #[arg(long)]
    pub normalize: bool,

    #[arg(long)]
    pub text_size: Option<i64>,

    /// Facet layout (grid or wrap)
    #[arg(long)]
    pub facet: Option<String>,

    #[arg(long)]
    pub shape: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub size: Option<String>,

    #[arg(long)]
    pub alpha: Option<String>,

    /// Requested image width in pixels (capped by the server maximum)
    #[arg(long)]
    pub width: Option<u32>,
}

/// Collects failure messages and echoes them to stderr.
#[derive(Default)]
pub struct StderrReporter {
    messages: RefCell<Vec<String>>,
}

impl StderrReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl FailureReporter for StderrReporter {
    fn report(&self, message: &str) {
        tracing::warn!(error = %message, "Failure reported");
        eprintln!("error: {message}");
        self.messages.borrow_mut().push(message.to_string());
    }
}

fn parse_demographic(field: FieldId, value: Option<&str>) -> Result<Option<Demographic>> {
    match value {
        None | Some("") | Some("none") => Ok(None),
        Some(raw) => Demographic::parse(raw)
            .map(Some)
            .ok_or_else(|| eyre!("'{raw}' is not a valid {field}")),
    }
}

/// Apply `args` to a freshly initialized controller.
pub fn fill_form(
    controller: &mut ExplorerController,
    collaborators: &Collaborators<'_>,
    args: &PlotArgs,
) -> Result<()> {
    let response = ResponseVariable::parse(&args.response)
        .ok_or_else(|| eyre!("'{}' is not a valid response variable", args.response))?;
    controller.select_response(Some(response))?;

    let effects = controller.select_timepoint(Some(&args.timepoint))?;
    drive(controller, collaborators, effects);

    controller.select_cohorts(&args.cohorts)?;
    controller.set_genes(args.genes.clone())?;

    if args.normalize {
        controller.set_normalize(true)?;
    }
    if let Some(size) = args.text_size {
        controller.set_text_size(&size.to_string())?;
    }
    if let Some(facet) = &args.facet {
        let facet = Facet::parse(facet).ok_or_else(|| eyre!("'{facet}' is not a valid facet"))?;
        controller.set_facet(facet);
    }
    for (field, value) in [
        (FieldId::Shape, &args.shape),
        (FieldId::Color, &args.color),
        (FieldId::Size, &args.size),
        (FieldId::Alpha, &args.alpha),
    ] {
        if value.is_some() {
            controller.set_aesthetic(field, parse_demographic(field, value.as_deref())?)?;
        }
    }
    if let Some(width) = args.width {
        controller.resize(width);
    }
    Ok(())
}

/// Run one plot request and return the image URL.
pub fn run_plot(
    controller: &mut ExplorerController,
    collaborators: &Collaborators<'_>,
    args: &PlotArgs,
) -> Result<String> {
    let effects = controller.initialize();
    drive(controller, collaborators, effects);

    fill_form(controller, collaborators, args)?;

    let effects = controller.submit()?;
    drive(controller, collaborators, effects);

    match controller.last_outcome() {
        Some(CycleOutcome::Succeeded { image: Some(url) }) => Ok(url.clone()),
        Some(CycleOutcome::Succeeded { image: None }) => bail!("the report produced no image"),
        Some(CycleOutcome::Failed(message)) => bail!("plot failed: {message}"),
        None => bail!("plot request did not complete"),
    }
}

/// Entry point of the `plot` subcommand.
pub fn plot(settings: Settings, args: &PlotArgs) -> Result<()> {
    let client = LabKeyClient::new(settings.server.clone())
        .wrap_err("failed to create the LabKey client")?;
    let reporter = StderrReporter::default();
    let collaborators = Collaborators {
        remote: Remote::from_host(&client),
        failures: &reporter,
    };

    let mut controller = ExplorerController::new(settings.explorer);
    let url = run_plot(&mut controller, &collaborators, args)?;

    println!("{url}");
    if let Ok(source) = client.source_url() {
        tracing::info!(%source, "Report source");
    }
    Ok(())
}
