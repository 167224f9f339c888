use crate::infra::{CsvTableProvider, IntelligenceState};
use crate::routes::DEFAULT_REGION_CODE;
use clap::Args;
use std::path::PathBuf;
use vioscore::error::AppError;
use vioscore::intelligence::{
    ReportBuilder, ReportNode, Table, TableSnapshot, PRIMARY_TABLE, REQUIRED_TABLES, SCHEMA_TABLE,
};

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Region to report on, e.g. NL00, GM0363
    #[arg(long, default_value = DEFAULT_REGION_CODE)]
    pub(crate) region_code: String,
    /// Directory holding one CSV export per table
    #[arg(long, default_value = "data")]
    pub(crate) data_dir: PathBuf,
    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub(crate) compact: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Region to report on; the sample snapshot only knows NL00 and GM0363
    #[arg(long, default_value = DEFAULT_REGION_CODE)]
    pub(crate) region_code: String,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let provider = CsvTableProvider::new(args.data_dir);
    let snapshot = TableSnapshot::load(&provider, REQUIRED_TABLES)?;
    let state = IntelligenceState::from_snapshot(snapshot)?;

    let report = ReportBuilder::new(&state.snapshot, &state.schema).build(&args.region_code)?;
    print_report(&report, args.compact)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let state = IntelligenceState::from_snapshot(sample_snapshot())?;
    let report = ReportBuilder::new(&state.snapshot, &state.schema).build(&args.region_code)?;
    print_report(&report, false)
}

fn print_report(report: &ReportNode, compact: bool) -> Result<(), AppError> {
    let rendered = if compact {
        serde_json::to_string(report)
    } else {
        serde_json::to_string_pretty(report)
    }
    .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
    println!("{rendered}");
    Ok(())
}

/// Small but structurally complete snapshot: two regions, two vioscore
/// groups, three scored Health categories and an aliased weather attribute.
fn sample_snapshot() -> TableSnapshot {
    let primary = Table::from_csv(
        PRIMARY_TABLE,
        "region_code,region_name,smoker,lonely,severely_or_very_seriously_lonely,volunteer_work,caregiver\n\
         NL00,Nederland,0.22,0.10,0.04,0.47,0.35\n\
         GM0363,Amsterdam,0.25,0.14,0.06,0.41,0.29\n"
            .as_bytes(),
    )
    .expect("sample primary table is well-formed");

    let schema = Table::from_csv(
        SCHEMA_TABLE,
        "attribute,current_category,dimension,vioscore,table_name,dutch_names\n\
         smoker,smoker,Health,VioScore,health_vioscore_table,\n\
         lonely,loneliness,Health,VioScore,health_vioscore_table,\n\
         severely_or_very_seriously_lonely,loneliness,Health,VioScore,health_vioscore_table,\n\
         volunteer_work,caregiving,Health,VioScore,health_vioscore_table,\n\
         caregiver,caregiving,Health,VioScore,health_vioscore_table,\n\
         sun_hours,climate,Environment,VioScore,weather_data,zonuren\n\
         population,demographics,Society,Other,world_data,inwoners\n"
            .as_bytes(),
    )
    .expect("sample schema table is well-formed");

    let weather = Table::from_csv(
        "weather_data",
        "region_code,zonuren\nNL00,1662.5\nGM0363,1710.0\n".as_bytes(),
    )
    .expect("sample weather table is well-formed");

    let world = Table::from_csv(
        "world_data",
        "region_code,inwoners\nNL00,17811291\nGM0363,882633\n".as_bytes(),
    )
    .expect("sample world table is well-formed");

    TableSnapshot::from_tables([primary, schema, weather, world])
}
