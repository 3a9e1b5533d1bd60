//! # pump-report CLI
//!
//! Usage:
//!   pump-report --request visit.json -o report.pdf
//!   cat visit.json | pump-report --lang th --thai-font Sarabun-Regular.ttf
//!   pump-report --example > visit.json

use std::fs;
use std::io::{self, BufRead, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use pump_report::assets::HttpAssetSource;
use pump_report::delivery::{Delivery, DirectoryDelivery, PreviewSession};
use pump_report::report::{
    self, ChecklistItem, ChecklistSnapshot, FormSnapshot, Language, PageFlow, ReportRequest,
    ChecklistVariant, ReportConfig,
};
use pump_report::report::styles::THAI_FONT_FAMILY;
use pump_report::{EngineConfig, FontEntry};

#[derive(Parser)]
#[command(name = "pump-report", version, about = "Render a pump service visit report to PDF")]
struct Args {
    /// JSON report request; read from stdin when omitted
    #[arg(long)]
    request: Option<PathBuf>,
    /// Output file (defaults to the generated name in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Report language: en or th
    #[arg(long)]
    lang: Option<Language>,
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
    #[arg(long, value_enum)]
    flow: Option<FlowArg>,
    /// Logo URL or path
    #[arg(long)]
    logo: Option<String>,
    /// QR code URL or path
    #[arg(long)]
    qr: Option<String>,
    /// TrueType font with Thai glyphs, registered as "Sarabun"
    #[arg(long)]
    thai_font: Option<PathBuf>,
    /// Keep a preview file open until Enter is pressed
    #[arg(long)]
    preview: bool,
    /// Print a sample request and exit
    #[arg(long)]
    example: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    PreService,
    Full,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FlowArg {
    Single,
    Paged,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.example {
        match serde_json::to_string_pretty(&example_request()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = run(args).await {
        log::error!("{:#}", e);
        eprintln!("{}", report::content::FAILURE_NOTICE);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let (json, base_dir) = match &args.request {
        Some(path) => (
            fs::read_to_string(path)?,
            path.parent().map(Path::to_path_buf).unwrap_or_default(),
        ),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            (buf, PathBuf::new())
        }
    };
    let mut request: ReportRequest = serde_json::from_str(&json)?;
    apply_overrides(&args, &mut request);

    let mut engine = EngineConfig::default();
    if let Some(path) = &args.thai_font {
        let data = fs::read(path)?;
        engine = engine
            .with_font(FontEntry::new(THAI_FONT_FAMILY, 400, data.clone()))
            .with_font(FontEntry::new(THAI_FONT_FAMILY, 700, data));
    }

    let source = HttpAssetSource::new(reqwest::Client::new()).with_root(base_dir);
    let document = report::generate_document(
        &source,
        &request.snapshot,
        &request.checklist,
        request.language,
        &request.config,
        &engine,
    )
    .await?;

    let saved = match &args.output {
        Some(path) => {
            fs::write(path, document.bytes())?;
            path.clone()
        }
        None => DirectoryDelivery::new(".").deliver(document.filename(), document.bytes())?,
    };
    eprintln!("✓ Written {} bytes to {}", document.bytes().len(), saved.display());

    if args.preview {
        let mut session = PreviewSession::new();
        let locator = session.open(&document)?;
        eprintln!("Preview: {}  (press Enter to close)", locator);
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        session.close();
    }
    Ok(())
}

fn apply_overrides(args: &Args, request: &mut ReportRequest) {
    if let Some(lang) = args.lang {
        request.language = lang;
    }
    if let Some(variant) = args.variant {
        request.config.variant = match variant {
            VariantArg::PreService => ChecklistVariant::PreServiceOnly,
            VariantArg::Full => ChecklistVariant::Full,
        };
    }
    if let Some(flow) = args.flow {
        request.config.flow = match flow {
            FlowArg::Single => PageFlow::SingleFlow,
            FlowArg::Paged => PageFlow::Paged,
        };
    }
    if let Some(logo) = &args.logo {
        request.config.logo_url = logo.clone();
    }
    if let Some(qr) = &args.qr {
        request.config.qr_url = qr.clone();
    }
}

fn example_request() -> ReportRequest {
    ReportRequest {
        snapshot: FormSnapshot {
            company: "Acme Co".to_string(),
            site_location: "Map Ta Phut Industrial Estate, Rayong".to_string(),
            contact_person: "Somchai P.".to_string(),
            department: "Maintenance".to_string(),
            phone: "038-123-456".to_string(),
            email: "maintenance@acme.example".to_string(),
            pump_model: "CPK 80-250".to_string(),
            serial_number: "SN-0042117".to_string(),
            manufacture_year: "2016".to_string(),
            operating_hours: "41250".to_string(),
            last_service_date: "12/09/2022".to_string(),
            installation_date: "03/02/2017".to_string(),
            temperature: "85 °C".to_string(),
            flow_rate: "120 m³/h".to_string(),
            suction_pressure: "1.2 bar".to_string(),
            discharge_pressure: "6.8 bar".to_string(),
            total_head: "58 m".to_string(),
            pumped_medium: "Condensate".to_string(),
            service_reason: "Rising vibration on the drive-end bearing and a small seal leak."
                .to_string(),
            training_hours: "8".to_string(),
        },
        checklist: ChecklistSnapshot::new()
            .with(ChecklistItem::SafetyTraining, true)
            .with(ChecklistItem::Ppe, true)
            .with(ChecklistItem::WorkPermit, false),
        language: Language::English,
        config: ReportConfig::pre_service(),
    }
}
