mod inspect;
mod script;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use api::{
    AdmissionDraft, ApiConfig, ApiError, AppointmentDraft, BedDraft, HmsClient, HospitalDraft, MedicineDraft,
    PatientDraft, RequestContext, UserDraft,
};
use canvas::consts::PALETTE;
use canvas::engine::Engine;
use canvas::export::{ExportDocument, ExportError, ImportError};
use canvas::render::{self, RenderError};
use canvas::upload::{ImageFile, UploadError};
use clap::{Args, Parser, Subcommand};
use forms::schemas::{self, SCHEMA_NAMES};
use forms::{DEFAULT_PAGE_SIZE, FormParseError, ValidationErrors, paginate, parse_form};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Script(#[from] script::ScriptError),
    #[error(transparent)]
    FormParse(#[from] FormParseError),
    #[error("unknown form '{0}' (expected one of: {names})", names = SCHEMA_NAMES.join(", "))]
    UnknownForm(String),
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("missing token; pass --token or set HMS_TOKEN (see `api login`)")]
    MissingToken,
    #[error("invalid --at time '{0}'; expected RFC 3339")]
    Time(String),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pixel-marker", about = "Pixel-marker annotation tool and hospital admin API client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an image with the markers and annotations of an export to PNG.
    Render(RenderArgs),
    /// Replay a JSON Lines gesture script over an image and export the result.
    Annotate(AnnotateArgs),
    /// Summarize and check an export document.
    Inspect { file: PathBuf },
    /// Validate form data against a built-in form schema.
    Validate(ValidateArgs),
    /// List the stroke colour swatches.
    Palette,
    /// Call the hospital admin REST API.
    Api(ApiArgs),
}

#[derive(Args, Debug)]
struct Viewport {
    /// Canvas width in pixels; defaults to the image width.
    #[arg(long, requires = "height")]
    width: Option<f64>,
    /// Canvas height in pixels; defaults to the image height.
    #[arg(long, requires = "width")]
    height: Option<f64>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long)]
    image: PathBuf,
    /// Export document to draw over the image.
    #[arg(long)]
    data: Option<PathBuf>,
    #[arg(long)]
    out: PathBuf,
    #[command(flatten)]
    viewport: Viewport,
}

#[derive(Args, Debug)]
struct AnnotateArgs {
    #[arg(long)]
    image: PathBuf,
    #[arg(long, default_value = "-", help = "Script file path, or - for stdin")]
    script: String,
    /// Where to write the export JSON; stdout when absent.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Also render the annotated image at native size.
    #[arg(long)]
    png: Option<PathBuf>,
    #[command(flatten)]
    viewport: Viewport,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Schema name.
    form: String,
    /// Form values as a flat JSON object; read from stdin when absent.
    #[arg(long)]
    data: Option<String>,
}

#[derive(Args, Debug)]
struct ApiArgs {
    #[arg(long, env = "HMS_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "HMS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "HMS_USER_ID")]
    user_id: Option<String>,

    #[arg(long, env = "HMS_HOSPITAL_ID")]
    hospital_id: Option<String>,

    /// Page of list results to show (1-based).
    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    #[command(subcommand)]
    command: ApiCommand,
}

#[derive(Subcommand, Debug)]
enum ApiCommand {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "HMS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Users,
    User {
        id: String,
    },
    Designations,
    /// Users holding a designation, e.g. doctors.
    Doctors {
        designation: String,
    },
    Hospitals,
    Hospital {
        id: String,
    },
    Beds,
    Product {
        id: String,
    },
    Patients,
    Patient {
        id: String,
    },
    Appointments,
    CreateUser {
        #[arg(long)]
        data: String,
    },
    UpdateUser {
        id: String,
        #[arg(long)]
        data: String,
    },
    DeleteUser {
        id: String,
    },
    CreateHospital {
        #[arg(long)]
        data: String,
    },
    CreateBed {
        #[arg(long)]
        data: String,
    },
    CreateMedicine {
        #[arg(long)]
        data: String,
    },
    UpdateMedicine {
        id: String,
        #[arg(long)]
        data: String,
    },
    CreatePatient {
        #[arg(long)]
        data: String,
    },
    CreateAppointment {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        doctor: String,
        /// Appointment time, RFC 3339.
        #[arg(long)]
        at: String,
        #[arg(long, default_value = "")]
        reason: String,
    },
    Admit {
        #[arg(long)]
        data: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render(args) => run_render(&args),
        Command::Annotate(args) => run_annotate(&args),
        Command::Inspect { file } => run_inspect(&file),
        Command::Validate(args) => run_validate(&args),
        Command::Palette => {
            for swatch in PALETTE {
                println!("{swatch}");
            }
            Ok(())
        }
        Command::Api(args) => run_api(args).await,
    }
}

// =============================================================================
// CANVAS
// =============================================================================

fn load_engine(image: &Path, viewport: &Viewport) -> Result<Engine, CliError> {
    let file = ImageFile::from_path(image)?;
    let mut engine = Engine::new();
    engine.upload(&file)?;
    let (width, height) = match (viewport.width, viewport.height) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            let session = engine.core.image().ok_or(RenderError::NoImage)?;
            (f64::from(session.width()), f64::from(session.height()))
        }
    };
    engine.set_viewport(width, height);
    Ok(engine)
}

fn run_render(args: &RenderArgs) -> Result<(), CliError> {
    let mut engine = load_engine(&args.image, &args.viewport)?;
    if let Some(path) = &args.data {
        let document = ExportDocument::from_json(&read_file(path)?)?;
        engine.core.import(document)?;
    }
    let png = if args.viewport.width.is_some() {
        render::encode_png(engine.render()?)?
    } else {
        render::encode_png(&engine.render_native()?)?
    };
    write_file(&args.out, &png)?;
    tracing::info!(out = %args.out.display(), bytes = png.len(), "rendered");
    Ok(())
}

fn run_annotate(args: &AnnotateArgs) -> Result<(), CliError> {
    let mut engine = load_engine(&args.image, &args.viewport)?;
    let lines = if args.script == "-" {
        script::parse(io::stdin().lock())?
    } else {
        let path = Path::new(&args.script);
        let file = fs::File::open(path).map_err(|source| read_error(path, source))?;
        script::parse(io::BufReader::new(file))?
    };
    let stats = script::replay(&mut engine, &lines)?;
    tracing::info!(
        events = stats.events,
        markers = stats.markers_added,
        annotations = stats.annotations_added,
        discarded = stats.discarded,
        "script replayed"
    );

    let document = engine.export_now()?;
    let json = document.to_json_pretty()?;
    match &args.out {
        Some(path) => write_file(path, json.as_bytes())?,
        None => println!("{json}"),
    }
    if let Some(path) = &args.png {
        write_file(path, &render::encode_png(&engine.render_native()?)?)?;
    }
    Ok(())
}

fn run_inspect(path: &Path) -> Result<(), CliError> {
    let document = ExportDocument::from_json(&read_file(path)?)?;
    println!("{}", inspect::summarize(&document));
    Ok(())
}

// =============================================================================
// FORMS
// =============================================================================

fn run_validate(args: &ValidateArgs) -> Result<(), CliError> {
    let schema = schemas::by_name(&args.form).ok_or_else(|| CliError::UnknownForm(args.form.clone()))?;
    let raw = match &args.data {
        Some(data) => data.clone(),
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf).map_err(|source| read_error(Path::new("-"), source))?;
            buf
        }
    };
    let data = parse_form(&raw)?;
    match schema.validate(&data) {
        Ok(()) => {
            println!("ok");
            Ok(())
        }
        Err(errors) => {
            print_json(&errors)?;
            Err(errors.into())
        }
    }
}

// =============================================================================
// API
// =============================================================================

async fn run_api(args: ApiArgs) -> Result<(), CliError> {
    let mut config = ApiConfig::from_env()?;
    if let Some(url) = &args.base_url {
        config.base_url = ApiConfig::new(url)?.base_url;
    }
    let client = HmsClient::new(&config)?;

    if let ApiCommand::Login { username, password } = &args.command {
        let session = client.login(username, password).await?;
        tracing::info!(username = %session.username, hospital = %session.hospital, "signed in");
        return print_json(&session);
    }

    let ctx = context(&args)?;
    let today = OffsetDateTime::now_utc().date();
    match &args.command {
        ApiCommand::Login { .. } => Ok(()),
        ApiCommand::Users => print_page(&client.users(&ctx).await?, &args),
        ApiCommand::User { id } => print_json(&client.user_by_identifier(&ctx, id).await?),
        ApiCommand::Designations => print_page(&client.designations(&ctx).await?, &args),
        ApiCommand::Doctors { designation } => print_page(&client.users_by_designation(&ctx, designation).await?, &args),
        ApiCommand::Hospitals => print_page(&client.hospitals(&ctx).await?, &args),
        ApiCommand::Hospital { id } => print_json(&client.hospital(&ctx, id).await?),
        ApiCommand::Beds => print_page(&client.beds(&ctx).await?, &args),
        ApiCommand::Product { id } => print_json(&client.product(&ctx, id).await?),
        ApiCommand::Patients => print_page(&client.patients(&ctx).await?, &args),
        ApiCommand::Patient { id } => print_json(&client.patient(&ctx, id).await?),
        ApiCommand::Appointments => print_page(&client.appointments(&ctx).await?, &args),
        ApiCommand::CreateUser { data } => {
            let draft = UserDraft::create(&parse_form(data)?, &ctx, today)?;
            print_json(&client.create_user(&ctx, &draft).await?)
        }
        ApiCommand::UpdateUser { id, data } => {
            let draft = UserDraft::update(&parse_form(data)?, &ctx, id, today)?;
            print_json(&client.update_user(&ctx, &draft).await?)
        }
        ApiCommand::DeleteUser { id } => print_json(&client.delete_user(&ctx, id).await?),
        ApiCommand::CreateHospital { data } => {
            let draft = HospitalDraft::from_form(&parse_form(data)?)?;
            print_json(&client.create_hospital(&ctx, &draft).await?)
        }
        ApiCommand::CreateBed { data } => {
            let draft = BedDraft::from_form(&parse_form(data)?, &ctx)?;
            print_json(&client.create_bed(&ctx, &draft).await?)
        }
        ApiCommand::CreateMedicine { data } => {
            let draft = MedicineDraft::from_form(&parse_form(data)?, &ctx, None)?;
            print_json(&client.create_product(&ctx, &draft).await?)
        }
        ApiCommand::UpdateMedicine { id, data } => {
            let draft = MedicineDraft::from_form(&parse_form(data)?, &ctx, Some(id))?;
            print_json(&client.update_product(&ctx, &draft).await?)
        }
        ApiCommand::CreatePatient { data } => {
            let draft = PatientDraft::from_form(&parse_form(data)?, &ctx, today)?;
            print_json(&client.create_patient(&ctx, &draft).await?)
        }
        ApiCommand::CreateAppointment { patient, doctor, at, reason } => {
            let at = OffsetDateTime::parse(at, &Rfc3339).map_err(|_| CliError::Time(at.clone()))?;
            let draft = AppointmentDraft::new(&ctx, patient, doctor, at, reason)?;
            print_json(&client.create_appointment(&ctx, &draft).await?)
        }
        ApiCommand::Admit { data } => {
            let draft = AdmissionDraft::from_form(&parse_form(data)?, &ctx, OffsetDateTime::now_utc())?;
            print_json(&client.create_admission(&ctx, &draft).await?)
        }
    }
}

fn context(args: &ApiArgs) -> Result<RequestContext, CliError> {
    let token = args.token.as_deref().filter(|t| !t.trim().is_empty()).ok_or(CliError::MissingToken)?;
    let mut ctx = RequestContext::new(token);
    if let Some(user) = &args.user_id {
        ctx = ctx.with_user(user.as_str());
    }
    if let Some(hospital) = &args.hospital_id {
        ctx = ctx.with_hospital(hospital.as_str());
    }
    Ok(ctx)
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_page<T: Serialize>(items: &[T], args: &ApiArgs) -> Result<(), CliError> {
    let page = paginate(items, args.page, args.page_size);
    print_json(&serde_json::json!({
        "page": page.page,
        "totalPages": page.total_pages,
        "totalItems": page.total_items,
        "items": page.items,
    }))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| read_error(path, source))
}

fn read_error(path: &Path, source: io::Error) -> CliError {
    CliError::Read { path: path.display().to_string(), source }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes).map_err(|source| CliError::Write { path: path.display().to_string(), source })
}
