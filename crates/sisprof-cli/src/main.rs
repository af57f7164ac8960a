use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sisprof_cli::director::{MIN_PASSWORD_LENGTH, create_director};
use sisprof_cli::seeder::{self, SeedConfig};
use sisprof_config::{DatabaseConfig, ProvisioningConfig};
use sisprof_db::{init_db_pool, init_store, run_migrations};

#[derive(Parser)]
#[command(name = "sisprof-cli")]
#[command(about = "SisProf CLI - Administrative tools for SisProf", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the embedded database migrations
    Migrate,
    /// Create a director account
    CreateDirector {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the store with fake disciplines, classes, teachers and students
    Seed {
        /// Number of disciplines to create
        #[arg(long, default_value = "6")]
        disciplines: usize,

        /// Number of classes to create
        #[arg(short = 'c', long, default_value = "4")]
        classes: usize,

        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "8")]
        teachers: usize,

        /// Number of students per class
        #[arg(short = 's', long, default_value = "25")]
        students: usize,

        /// Password shared by every seeded login
        #[arg(long, default_value = "sisprof123")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    sisprof_observability::init_basic_console_logging();

    let cli = Cli::parse();
    let database_config = DatabaseConfig::from_env();
    let provisioning_config = ProvisioningConfig::from_env();

    match cli.command {
        Commands::Migrate => {
            let pool = init_db_pool(&database_config)
                .await
                .map_err(|err| err.error)?;
            run_migrations(&pool).await.map_err(|err| err.error)?;
            println!("✅ Migrations applied");
        }
        Commands::CreateDirector {
            username,
            email,
            password,
        } => {
            let username = match username {
                Some(username) => username,
                None => Input::new().with_prompt("Username").interact_text()?,
            };
            let email = match email {
                Some(email) => email,
                None => Input::new().with_prompt("Email address").interact_text()?,
            };
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt(format!("Password (min {} characters)", MIN_PASSWORD_LENGTH))
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()?,
            };

            let store = init_store(&database_config).await.map_err(|err| err.error)?;
            let account = create_director(
                store.as_ref(),
                &username,
                &email,
                &password,
                provisioning_config.bcrypt_cost,
            )
            .await?;

            println!("\n✅ Director created successfully!");
            println!("   Username: {}", account.username);
            println!("   Email: {}", account.email);
        }
        Commands::Seed {
            disciplines,
            classes,
            teachers,
            students,
            password,
        } => {
            let config = SeedConfig::default()
                .with_disciplines(disciplines)
                .with_classes(classes)
                .with_teachers(teachers)
                .with_students_per_class(students)
                .with_password(password);

            let store = init_store(&database_config).await.map_err(|err| err.error)?;
            seeder::seed_all(store.as_ref(), &config, provisioning_config.bcrypt_cost).await?;
        }
    }

    Ok(())
}
