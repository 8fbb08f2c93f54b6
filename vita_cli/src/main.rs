use clap::{Parser, Subcommand};
use dialoguer::{Input, Password, Select};
use std::path::PathBuf;
use vita_core::*;

#[derive(Parser)]
#[command(name = "vita")]
#[command(about = "Personal health assistant: BMI, BMR and water intake", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute health metrics directly, without the interactive session
    Calc {
        /// Weight in kilograms (20-300)
        #[arg(long)]
        weight: f64,

        /// Height in centimeters (50-250)
        #[arg(long)]
        height: f64,

        /// Age in years (5-120)
        #[arg(long)]
        age: u32,

        /// Gender (man/male or woman/female)
        #[arg(long)]
        gender: String,

        /// Activity level (low/medium/high)
        #[arg(long, default_value = "low")]
        activity: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    vita_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Calc {
            weight,
            height,
            age,
            gender,
            activity,
        }) => cmd_calc(weight, height, age, &gender, &activity),
        None => cmd_session(data_dir),
    }
}

/// Interactive session: authenticate, collect measurements, show results
fn cmd_session(data_dir: PathBuf) -> Result<()> {
    let store = FileStore::new(Config::users_path_in(&data_dir));
    let auth = Authenticator::new(store);

    println!("== Welcome to Vita Health Assistant ==");

    let user = match auth_flow(&auth)? {
        AuthOutcome::LoggedIn(user) => user,
        AuthOutcome::Exit => {
            println!("Exit.");
            return Ok(());
        }
    };

    println!("\nHello, {}! === Starting Health Metrics Calculation ===", user);

    let measurements = prompt_measurements()?;
    display_report(&compute_report(&measurements));

    Ok(())
}

/// Outcome of the authentication menu loop
enum AuthOutcome {
    LoggedIn(String),
    Exit,
}

/// Register / login / exit menu loop.
///
/// Recoverable failures (duplicate username, password mismatch, unknown
/// user, wrong password) are reported and loop back to the menu. A
/// corrupt credential store aborts the session with its diagnostic.
fn auth_flow<S: CredentialStore>(auth: &Authenticator<S>) -> Result<AuthOutcome> {
    loop {
        let choice = Select::new()
            .with_prompt("Please choose")
            .items(&["Register", "Login", "Exit"])
            .default(0)
            .interact()
            .map_err(prompt_err)?;

        let result = match choice {
            0 => {
                let username: String = Input::new()
                    .with_prompt("Please input username")
                    .validate_with(|s: &String| {
                        if s.trim().is_empty() {
                            Err("Please input a username.")
                        } else {
                            Ok(())
                        }
                    })
                    .interact_text()
                    .map_err(prompt_err)?;
                let password = Password::new()
                    .with_prompt("Please input password")
                    .interact()
                    .map_err(prompt_err)?;
                let confirm = Password::new()
                    .with_prompt("Please confirm password")
                    .interact()
                    .map_err(prompt_err)?;

                auth.register(&username, &password, &confirm)
                    .map(|()| println!("Registered."))
            }
            1 => {
                let username: String = Input::new()
                    .with_prompt("Username")
                    .validate_with(|s: &String| {
                        if s.trim().is_empty() {
                            Err("Please input a username.")
                        } else {
                            Ok(())
                        }
                    })
                    .interact_text()
                    .map_err(prompt_err)?;
                let password = Password::new()
                    .with_prompt("Password")
                    .interact()
                    .map_err(prompt_err)?;

                match auth.authenticate(&username, &password) {
                    Ok(identity) => {
                        println!("Login Success! {}!", identity);
                        return Ok(AuthOutcome::LoggedIn(identity));
                    }
                    Err(e) => Err(e),
                }
            }
            _ => return Ok(AuthOutcome::Exit),
        };

        if let Err(e) = result {
            if e.is_recoverable() {
                println!("{}", e);
                continue;
            }
            return Err(e);
        }
    }
}

/// Collect measurements with inline range validation and re-prompt
fn prompt_measurements() -> Result<Measurements> {
    let weight_kg = prompt_in_range("Please enter your weight (kg)", WEIGHT_KG_RANGE)?;
    let height_cm = prompt_in_range("Please enter your height (cm)", HEIGHT_CM_RANGE)?;

    let age_years: u32 = Input::<u32>::new()
        .with_prompt("Please enter your age (years)")
        .validate_with(|v: &u32| {
            if AGE_YEARS_RANGE.contains(v) {
                Ok(())
            } else {
                Err(format!(
                    "Please input {} to {} number.",
                    AGE_YEARS_RANGE.start(),
                    AGE_YEARS_RANGE.end()
                ))
            }
        })
        .interact_text()
        .map_err(prompt_err)?;

    // Categorical inputs are picked from a list, so InvalidGender cannot
    // occur in the interactive path.
    let gender = match Select::new()
        .with_prompt("Please select your gender")
        .items(&["male", "female"])
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => Gender::Male,
        _ => Gender::Female,
    };

    let activity = match Select::new()
        .with_prompt("Activity level")
        .items(&["low", "medium", "high"])
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => ActivityLevel::Low,
        1 => ActivityLevel::Medium,
        _ => ActivityLevel::High,
    };

    Ok(Measurements {
        weight_kg,
        height_cm,
        age_years,
        gender,
        activity: Some(activity),
    })
}

fn prompt_in_range(prompt: &str, range: std::ops::RangeInclusive<f64>) -> Result<f64> {
    Input::<f64>::new()
        .with_prompt(prompt)
        .validate_with(move |v: &f64| {
            if range.contains(v) {
                Ok(())
            } else {
                Err(format!(
                    "Please input {} to {} number.",
                    range.start(),
                    range.end()
                ))
            }
        })
        .interact_text()
        .map_err(prompt_err)
}

/// Non-interactive computation for scripting and tests.
///
/// Range violations and unrecognized genders are fatal here; the
/// interactive path handles them by re-prompting instead.
fn cmd_calc(weight: f64, height: f64, age: u32, gender: &str, activity: &str) -> Result<()> {
    if !WEIGHT_KG_RANGE.contains(&weight) {
        return Err(Error::Config(format!(
            "weight must be between {} and {} kg",
            WEIGHT_KG_RANGE.start(),
            WEIGHT_KG_RANGE.end()
        )));
    }
    if !HEIGHT_CM_RANGE.contains(&height) {
        return Err(Error::Config(format!(
            "height must be between {} and {} cm",
            HEIGHT_CM_RANGE.start(),
            HEIGHT_CM_RANGE.end()
        )));
    }
    if !AGE_YEARS_RANGE.contains(&age) {
        return Err(Error::Config(format!(
            "age must be between {} and {} years",
            AGE_YEARS_RANGE.start(),
            AGE_YEARS_RANGE.end()
        )));
    }

    let measurements = Measurements {
        weight_kg: weight,
        height_cm: height,
        age_years: age,
        gender: gender.parse()?,
        activity: ActivityLevel::parse_lenient(activity),
    };

    display_report(&compute_report(&measurements));
    Ok(())
}

fn display_report(report: &MetricsReport) {
    println!("\nYour BMI is: {:.1}", report.bmi);
    println!(
        "Your BMR (Basal Metabolic Rate) is approximately: {:.0} kcal/day",
        report.bmr_kcal
    );
    println!("Recommended daily water intake: {:.1} L", report.water_liters);
    println!("Recommendation: {}", recommendation(report.category));
}

fn recommendation(category: BmiCategory) -> &'static str {
    match category {
        BmiCategory::Underweight => "Underweight — consider increasing nutritional intake.",
        BmiCategory::Healthy => "Healthy weight — maintain your current lifestyle.",
        BmiCategory::Overweight => {
            "Overweight — consider increasing exercise and monitoring your diet."
        }
    }
}

fn prompt_err(e: dialoguer::Error) -> Error {
    Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}
