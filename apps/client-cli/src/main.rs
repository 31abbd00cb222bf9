mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use time::Date;
use tracing::debug;
use web_client::booking::{AvailabilityCalendar, BookingDraft, BookingStatus};
use web_client::dates::parse_iso_date;
use web_client::services::bookings::{create_booking, my_bookings, BOOKING_FAILED_MESSAGE};
use web_client::services::host::{
    delete_unit, host_bookings, host_dashboard, host_reviews, mark_review_read,
    update_booking_status,
};
use web_client::services::profile::update_profile;
use web_client::services::properties::{get_property, is_owner, list_properties, search_properties};
use web_client::services::reviews::{submit_review, REVIEW_FAILED_MESSAGE};
use web_client::services::{ProfileUpdate, PropertySearch, ReviewDraft};
use web_client::{build_session, ClientConfig, ClientError, GateDecision, SessionContext, ViewScope};

#[derive(Clone, ValueEnum)]
enum Status {
    Confirmed,
    Cancelled,
    Completed,
}

impl From<Status> for BookingStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Confirmed => BookingStatus::Confirmed,
            Status::Cancelled => BookingStatus::Cancelled,
            Status::Completed => BookingStatus::Completed,
        }
    }
}

#[derive(Parser)]
#[command(name = "stay")]
#[command(about = "Command-line client for the rental marketplace API")]
struct Args {
    /// API root (overrides STAY_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the token pair for this API origin
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget stored credentials
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// List or search properties
    Properties {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = iso_date)]
        check_in: Option<Date>,
        #[arg(long, value_parser = iso_date)]
        check_out: Option<Date>,
    },
    /// Show one property with its units and reviews
    Property { id: i64 },
    /// Reserved nights for a unit
    Availability { unit_id: i64 },
    /// Nights and total for a stay, without booking
    Quote {
        property_id: i64,
        unit_id: i64,
        #[arg(value_parser = iso_date)]
        check_in: Date,
        #[arg(value_parser = iso_date)]
        check_out: Date,
        #[arg(long, default_value_t = 1)]
        guests: u32,
    },
    /// Book a unit
    Book {
        property_id: i64,
        unit_id: i64,
        #[arg(value_parser = iso_date)]
        check_in: Date,
        #[arg(value_parser = iso_date)]
        check_out: Date,
        #[arg(long, default_value_t = 1)]
        guests: u32,
    },
    /// Bookings made by the signed-in user
    MyBookings,
    /// Bookings and reviews for the signed-in host's properties
    HostBookings {
        #[arg(long)]
        reviews: bool,
    },
    /// Host overview: properties, confirmed bookings and revenue
    HostSummary,
    /// Remove a unit from one of the host's properties
    DeleteUnit { unit_id: i64 },
    /// Move a host booking to a new status
    HostStatus {
        booking_id: i64,
        #[arg(value_enum)]
        status: Status,
    },
    /// Mark a guest review as read
    ReviewRead { review_id: i64 },
    /// Review a completed stay
    Review {
        booking_id: i64,
        rating: u8,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Show or update the profile
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
    },
    /// Whether the signed-in user may open an application path
    CanOpen { location: String },
}

fn iso_date(raw: &str) -> Result<Date, String> {
    parse_iso_date(raw).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    let args = Args::parse();

    let session = match open_session(args.api_url.as_deref()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&session, args.command).await {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

fn open_session(api_url: Option<&str>) -> Result<SessionContext, ClientError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = api_url {
        config = config.with_api_base_url(url)?;
    }
    debug!(api = %config.api_base_url, "opening session");
    build_session().with_config(config).build()
}

fn print<T: serde::Serialize>(value: &T) -> Result<(), ClientError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(session: &SessionContext, command: Command) -> Result<(), ClientError> {
    let api = session.api();
    match command {
        Command::Login { username, password } => {
            let claims = session.login(&username, &password).await?;
            println!("signed in as {} ({})", claims.display_name(), claims.role);
        }
        Command::Logout => {
            session.logout();
            println!("signed out");
        }
        Command::Whoami => match session.user() {
            Some(claims) => print(&json!({
                "user_id": claims.user_id,
                "username": claims.username,
                "email": claims.email,
                "role": claims.role,
            }))?,
            None => println!("not signed in"),
        },
        Command::Properties {
            search,
            check_in,
            check_out,
        } => {
            let filter = PropertySearch {
                search,
                check_in,
                check_out,
            };
            let properties = if filter.query_pairs().is_empty() {
                list_properties(api).await?
            } else {
                search_properties(api, &filter).await?
            };
            for property in properties {
                println!("{:>6}  {}  {}", property.id, property.title, property.location());
            }
        }
        Command::Property { id } => {
            let property = get_property(api, id).await?;
            let reviews = web_client::services::reviews::property_reviews(api, id).await?;
            print(&json!({ "property": property, "reviews": reviews }))?;
        }
        Command::Availability { unit_id } => {
            let mut calendar = AvailabilityCalendar::new(unit_id);
            calendar.load(api, &ViewScope::mounted()).await;
            let dates: Vec<String> = calendar
                .unavailable()
                .iter()
                .map(|d| web_client::dates::format_iso_date(*d))
                .collect();
            print(&dates)?;
        }
        Command::Quote {
            property_id,
            unit_id,
            check_in,
            check_out,
            guests,
        } => {
            let property = get_property(api, property_id).await?;
            let unit = property
                .unit(unit_id)
                .ok_or_else(|| ClientError::NotFound {
                    path: format!("unit {unit_id}"),
                })?;
            let draft = BookingDraft::new(unit_id).dates(check_in, check_out).guests(guests);
            let submission = draft.validate(unit.price_per_night, unit.max_guests)?;
            print(&json!({
                "unit": unit.label(),
                "nights": submission.nights,
                "price_per_night": unit.price_per_night,
                "total": submission.total,
                "own_unit": is_owner(session.user().as_ref(), &property),
            }))?;
        }
        Command::Book {
            property_id,
            unit_id,
            check_in,
            check_out,
            guests,
        } => {
            let property = get_property(api, property_id).await?;
            let unit = property
                .unit(unit_id)
                .ok_or_else(|| ClientError::NotFound {
                    path: format!("unit {unit_id}"),
                })?;
            let draft = BookingDraft::new(unit_id).dates(check_in, check_out).guests(guests);
            match create_booking(session, &property, unit, &draft).await {
                Ok(booking) => print(&booking)?,
                Err(e @ ClientError::Validation { .. }) => {
                    eprintln!("{}", e.message_with_fallback(BOOKING_FAILED_MESSAGE));
                    return Err(e);
                }
                Err(e) => return Err(e),
            }
        }
        Command::MyBookings => print(&my_bookings(api).await?)?,
        Command::HostBookings { reviews } => {
            if reviews {
                print(&host_reviews(api).await?)?;
            } else {
                print(&host_bookings(api).await?)?;
            }
        }
        Command::HostSummary => {
            let summary = host_dashboard(api).await?;
            print(&json!({
                "properties": summary.properties.len(),
                "active_bookings": summary.active_bookings,
                "confirmed_revenue": summary.confirmed_revenue.to_string(),
            }))?;
        }
        Command::DeleteUnit { unit_id } => {
            delete_unit(api, unit_id).await?;
            println!("unit {unit_id} deleted");
        }
        Command::HostStatus { booking_id, status } => {
            let bookings = host_bookings(api).await?;
            let booking = bookings
                .iter()
                .find(|b| b.id == booking_id)
                .ok_or_else(|| ClientError::NotFound {
                    path: format!("booking {booking_id}"),
                })?;
            let next = BookingStatus::from(status);
            update_booking_status(api, booking, next).await?;
            println!("booking {booking_id} is now {next}");
        }
        Command::ReviewRead { review_id } => {
            mark_review_read(api, review_id).await?;
            println!("review {review_id} marked as read");
        }
        Command::Review {
            booking_id,
            rating,
            comment,
        } => {
            let draft = ReviewDraft {
                booking_id,
                rating,
                comment,
            };
            if let Err(e) = submit_review(api, &draft).await {
                if matches!(e, ClientError::Validation { .. }) {
                    eprintln!("{}", e.message_with_fallback(REVIEW_FAILED_MESSAGE));
                }
                return Err(e);
            }
            println!("review submitted");
        }
        Command::Profile {
            first_name,
            last_name,
            phone_number,
        } => {
            let update = ProfileUpdate {
                first_name,
                last_name,
                phone_number,
            };
            print(&update_profile(api, &update).await?)?;
        }
        Command::CanOpen { location } => {
            let verdict = match session.guard(&location) {
                GateDecision::Render => "render".to_string(),
                GateDecision::Pending => "pending".to_string(),
                GateDecision::Redirect(to) => format!("redirect {}", to.path()),
            };
            println!("{verdict}");
        }
    }
    Ok(())
}
