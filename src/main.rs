use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use log::*;

use iisc_support::{
    api::ApiClient,
    attachments::PathPicker,
    auth,
    config::{CliArgs, Config},
    dashboard::{Dashboard, SubmitResult},
    errors::{AppError, AppResult},
    form::FieldEdit,
    logging,
    storage::FileStore,
    submission::{RequestKind, RequestSubmitter},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    options: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Create a new account
    Signup {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Submit a complaint
    Complaint(RequestArgs),
    /// Request support
    Support(RequestArgs),
    /// Show the stored profile
    Whoami,
    /// Forget the stored session
    Logout,
}

#[derive(clap::Args, Debug)]
struct RequestArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    enquiry_type: String,

    /// Image to attach, sent as camera.jpg
    #[arg(long, conflicts_with = "document")]
    photo: Option<PathBuf>,

    /// Document to attach
    #[arg(long)]
    document: Option<PathBuf>,

    /// Content type of the document [default: application/octet-stream]
    #[arg(long, requires = "document")]
    mime: Option<String>,
}

impl RequestArgs {
    fn edits(&self) -> [FieldEdit; 5] {
        [
            FieldEdit::Name(self.name.clone()),
            FieldEdit::Email(self.email.clone()),
            FieldEdit::Phone(self.phone.clone()),
            FieldEdit::Title(self.title.clone()),
            FieldEdit::EnquiryType(self.enquiry_type.clone()),
        ]
    }

    fn picker(&self) -> PathPicker {
        PathPicker {
            photo: self.photo.clone(),
            document: self.document.clone(),
            mime_type: self.mime.clone(),
        }
    }
}

fn alert(title: &str, message: &str) {
    println!("{title}: {message}");
}

// a refused permission only costs the attachment, the request still goes out
fn skip_if_denied(result: AppResult<()>) -> AppResult<()> {
    match result {
        Err(e @ AppError::PermissionDenied(..)) => {
            warn!("Continuing without attachment: {e}");
            alert(e.title(), &e.to_string());
            Ok(())
        }
        other => other,
    }
}

async fn run(command: Command, config: &Config) -> AppResult<ExitCode> {
    let store = FileStore::new(&config.storage_file);
    let client = ApiClient::new(&config.api_base_url, config.request_timeout())
        .map_err(AppError::HttpClient)?;

    match command {
        Command::Login { email, password } => {
            auth::login(&email, &password, &client, &store).await?;
            alert("Success", auth::LOGIN_SUCCESS);
        }
        Command::Signup {
            name,
            email,
            phone,
            password,
        } => {
            auth::signup(&name, &email, &phone, &password, &client).await?;
            alert("Success", "Account created, you can now log in.");
        }
        Command::Complaint(args) => {
            return submit_request(RequestKind::Complaint, args, client, &store).await;
        }
        Command::Support(args) => {
            return submit_request(RequestKind::Support, args, client, &store).await;
        }
        Command::Whoami => {
            let dashboard = Dashboard::load(&store);
            let session = dashboard.session();

            if !session.is_authenticated() {
                println!("Not logged in");
                return Ok(ExitCode::SUCCESS);
            }

            let profile = &session.profile;
            println!("Name:  {}", profile.name.as_deref().unwrap_or(""));
            println!("Email: {}", profile.email.as_deref().unwrap_or(""));
            println!("Phone: {}", profile.phone.as_deref().unwrap_or(""));
        }
        Command::Logout => {
            Dashboard::load(&store).logout(&store)?;
            println!("Logged out");
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn submit_request(
    kind: RequestKind,
    args: RequestArgs,
    client: ApiClient,
    store: &FileStore,
) -> AppResult<ExitCode> {
    let mut dashboard = Dashboard::load(store);
    dashboard.open_modal(kind);

    println!("{}", kind.heading());

    for edit in args.edits() {
        let field = edit.field();
        if !dashboard.edit(edit) {
            warn!("Ignoring input for {field}: contains characters the field does not accept");
        }
    }

    let picker = args.picker();
    if args.photo.is_some() {
        skip_if_denied(dashboard.take_photo(&picker))?;
    }
    if args.document.is_some() {
        skip_if_denied(dashboard.pick_document(&picker))?;
    }

    let submitter = RequestSubmitter::new(client);

    match dashboard.submit(&submitter).await? {
        SubmitResult::Blocked(errors) => {
            for (field, message) in errors {
                eprintln!("{field}: {message}");
            }

            Ok(ExitCode::FAILURE)
        }
        SubmitResult::Completed(outcome) => {
            alert(outcome.title(), outcome.message());

            if outcome.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.options) {
        Ok(config) => config,
        Err(errors) => {
            for error in errors {
                eprintln!("Fatal configuration error: {error}");
            }
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logger(config.verbosity, &config.log_file) {
        eprintln!("Failed to initialize logging: {e}");
    }

    debug!("{config:?}");

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            e.report();
            alert(e.title(), &e.to_string());
            ExitCode::FAILURE
        }
    }
}
