use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use uport_storefront::api::{ApiClient, Transport};
use uport_storefront::config;
use uport_storefront::navigation::{Navigator, Route};
use uport_storefront::screens::{
    CartScreen, ChangePasswordScreen, HomeScreen, LoginScreen, MyOrdersScreen,
    OrderDetailsScreen, Outcome, ProductScreen, ProfileScreen, RegisterScreen, SettingsScreen,
    SubCategoryScreen, VerifyOtpScreen,
};
use uport_storefront::services::media::FileImageSource;
use uport_storefront::services::push::LoggingPushRegistry;
use uport_storefront::services::{AppContext, RegisterRequest};
use uport_storefront::session::SessionContext;
use uport_storefront::store::SqliteStore;

#[derive(Debug, Parser)]
#[command(author, version, about = "Uport B2B grocery storefront")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a sample config file
    ExampleConfig,
    Login {
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        password: String,
    },
    /// Start registration; an OTP is sent to the mobile number
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        landmark: String,
        #[arg(long)]
        address: String,
        /// Area id or name; omit to list the areas
        #[arg(long)]
        area: Option<String>,
    },
    VerifyOtp {
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        otp: String,
    },
    Logout,
    Whoami,
    Home,
    Subcategories {
        category_id: i64,
        #[arg(long, default_value = "")]
        name: String,
    },
    Products {
        subcategory_id: i64,
        #[arg(long, default_value = "")]
        name: String,
    },
    Search {
        query: String,
    },
    Cart,
    /// Add one unit of a product variant from a subcategory listing
    CartAdd {
        subcategory_id: i64,
        /// Product index in the listing
        product: usize,
        /// Variant index within the product
        #[arg(long, default_value_t = 0)]
        variant: usize,
    },
    /// Set the quantity of a cart line; 0 removes it
    CartSet {
        line: usize,
        quantity: i64,
    },
    CartRemove {
        line: usize,
    },
    Checkout,
    Orders,
    Order {
        order_id: i64,
    },
    Profile,
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        landmark: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Upload a photo of a grocery list
    UploadList {
        path: PathBuf,
    },
    Settings {
        /// Turn push notifications on or off
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        check_version: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    if let Command::ExampleConfig = args.command {
        print!("{}", config::example());
        return Ok(());
    }

    let cfg = config::load(Some(&args.config))
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    cfg.ensure_dirs()
        .with_context(|| format!("failed to create {}", cfg.app.data_dir))?;

    let store = SqliteStore::open(&cfg.database_url())
        .await
        .context("failed to open local store")?;
    let session = SessionContext::new(Arc::new(store));
    let api: Arc<dyn Transport> = Arc::new(
        ApiClient::from_config(&cfg, session.clone()).context("failed to build api client")?,
    );
    let push = Arc::new(LoggingPushRegistry::new(
        cfg.notifications.app_id.clone(),
        cfg.notifications.enabled,
        session.clone(),
    ));
    let ctx = AppContext::new(
        api,
        session.clone(),
        push,
        cfg.api.base_url.clone(),
        cfg.app.version.clone(),
    );

    let logged_in = session
        .is_logged_in()
        .await
        .context("failed to read session")?;
    let mut nav = Navigator::initial(logged_in);
    info!(route = %nav.current(), "session restored");

    run(args.command, ctx, &mut nav).await
}

async fn run(command: Command, ctx: AppContext, nav: &mut Navigator) -> Result<()> {
    match command {
        Command::ExampleConfig => print!("{}", config::example()),
        Command::Login { mobile, password } => {
            let mut screen = LoginScreen::new(ctx);
            screen.mobile = mobile;
            screen.password = password;
            let outcome = screen.submit().await;
            report(outcome, nav);
        }
        Command::Register {
            name,
            mobile,
            password,
            email,
            company,
            landmark,
            address,
            area,
        } => {
            let mut screen = RegisterScreen::new(ctx);
            screen.load().await;
            screen.form = RegisterRequest {
                name,
                mobile,
                password,
                email,
                company_name: company,
                landmark,
                address,
                area_id: String::new(),
            };
            match area {
                Some(choice) if screen.choose_area(&choice) => {
                    let outcome = screen.submit().await;
                    report(outcome, nav);
                }
                Some(choice) => {
                    eprintln!("unknown area {choice:?}");
                    show(&screen);
                }
                None => show(&screen),
            }
        }
        Command::VerifyOtp { mobile, otp } => {
            let mut screen = VerifyOtpScreen::new(ctx, mobile);
            screen.otp = otp;
            let outcome = screen.submit().await;
            report(outcome, nav);
        }
        Command::Logout => {
            let mut screen = HomeScreen::new(ctx);
            let outcome = screen.logout().await;
            report(outcome, nav);
        }
        Command::Whoami => {
            let user = ctx.auth.current_user().await?;
            match user.id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => println!(
                    "{} (#{id}, {})",
                    user.name.as_deref().unwrap_or(""),
                    user.kind().label()
                ),
                None => println!("not logged in"),
            }
        }
        Command::Home => {
            let mut screen = HomeScreen::new(ctx);
            let outcome = screen.load().await;
            render(&screen, outcome, nav);
        }
        Command::Subcategories { category_id, name } => {
            let mut screen = SubCategoryScreen::new(ctx, category_id, name);
            let outcome = screen.load().await;
            render(&screen, outcome, nav);
        }
        Command::Products {
            subcategory_id,
            name,
        } => {
            let mut screen = ProductScreen::new(ctx, subcategory_id, name);
            let outcome = screen.load().await;
            render(&screen, outcome, nav);
        }
        Command::Search { query } => {
            let resp = ctx.catalog.search(query.trim()).await?;
            if resp.products.is_empty() {
                println!("No products found");
            }
            for product in &resp.products {
                let sizes: Vec<&str> = product
                    .list_product
                    .iter()
                    .map(|v| v.product_size.as_str())
                    .collect();
                println!("#{} {} [{}]", product.id, product.eng_name, sizes.join(", "));
            }
        }
        Command::Cart => {
            let mut screen = CartScreen::new(ctx);
            let outcome = screen.load().await;
            render(&screen, outcome, nav);
        }
        Command::CartAdd {
            subcategory_id,
            product,
            variant,
        } => {
            let mut screen = ProductScreen::new(ctx, subcategory_id, "");
            let loaded = screen.load().await;
            if loaded.is_error() {
                report(loaded, nav);
                return Ok(());
            }
            if !screen.select_variant(product, variant) {
                eprintln!("no variant {variant} for product {product}");
                return Ok(());
            }
            let outcome = screen.add_to_cart(product).await;
            render(&screen, outcome, nav);
        }
        Command::CartSet { line, quantity } => {
            let mut screen = CartScreen::new(ctx);
            let loaded = screen.load().await;
            if loaded.is_error() {
                report(loaded, nav);
                return Ok(());
            }
            let outcome = screen.change_quantity(line, quantity).await;
            render(&screen, outcome, nav);
        }
        Command::CartRemove { line } => {
            let mut screen = CartScreen::new(ctx);
            let loaded = screen.load().await;
            if loaded.is_error() {
                report(loaded, nav);
                return Ok(());
            }
            let outcome = screen.remove(line).await;
            render(&screen, outcome, nav);
        }
        Command::Checkout => {
            let mut screen = CartScreen::new(ctx);
            let loaded = screen.load().await;
            if loaded.is_error() {
                report(loaded, nav);
                return Ok(());
            }
            let outcome = screen.checkout().await;
            report(outcome, nav);
        }
        Command::Orders => {
            let mut screen = MyOrdersScreen::new(ctx);
            let outcome = screen.load().await;
            render(&screen, outcome, nav);
        }
        Command::Order { order_id } => {
            let mut screen = OrderDetailsScreen::new(ctx, order_id);
            let outcome = screen.load().await;
            render(&screen, outcome, nav);
        }
        Command::Profile => {
            let mut screen = ProfileScreen::new(ctx);
            let outcome = screen.load().await;
            render(&screen, outcome, nav);
        }
        Command::UpdateProfile {
            name,
            landmark,
            address,
        } => {
            let mut screen = ProfileScreen::new(ctx);
            let loaded = screen.load().await;
            if loaded.is_error() {
                report(loaded, nav);
                return Ok(());
            }
            if let Some(name) = name {
                screen.form.name = name;
            }
            if let Some(landmark) = landmark {
                screen.form.landmark = landmark;
            }
            if let Some(address) = address {
                screen.form.address = address;
            }
            let outcome = screen.update().await;
            render(&screen, outcome, nav);
        }
        Command::ChangePassword {
            current,
            new,
            confirm,
        } => {
            let mut screen = ChangePasswordScreen::new(ctx);
            screen.current_password = current;
            screen.new_password = new;
            screen.confirm_password = confirm;
            let outcome = screen.submit().await;
            report(outcome, nav);
        }
        Command::UploadList { path } => {
            nav.navigate(Route::UploadGroceryList);
            let mut screen = HomeScreen::new(ctx);
            let outcome = screen.upload_grocery_list(&FileImageSource::new(path)).await;
            report(outcome, nav);
        }
        Command::Settings {
            notifications,
            check_version,
        } => {
            let mut screen = SettingsScreen::new(ctx);
            let mut outcome = screen.load().await;
            if let Some(enabled) = notifications {
                outcome = screen.set_notifications(enabled).await;
            }
            if check_version {
                report(outcome, nav);
                outcome = screen.check_version().await;
            }
            render(&screen, outcome, nav);
        }
    }
    Ok(())
}

fn show(screen: &dyn Display) {
    println!("{screen}");
}

fn render(screen: &dyn Display, outcome: Outcome, nav: &mut Navigator) {
    show(screen);
    report(outcome, nav);
}

fn report(outcome: Outcome, nav: &mut Navigator) {
    if let Some(notice) = &outcome.notice {
        if notice.is_error() {
            eprintln!("{notice}");
        } else {
            println!("{notice}");
        }
    }
    if let Some(transition) = &outcome.transition {
        transition.apply(nav);
        println!("-> {}", nav.current());
    }
}
