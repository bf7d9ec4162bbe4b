use clap::Parser;
use futures::executor::block_on;
use modules::{
    account::AccountModule,
    health::{
        health_collector::{CollectorConfig, HealthDataCollector},
        health_standard::HealthStandard,
    },
    onboarding::OnboardingModule,
    reminders::{Calendar, Reminders},
    scheduler::Scheduler,
};
use spezi::{
    Configuration, DeviceToken, LaunchError, LaunchOptions, LifecycleEvent, Notification,
    NotificationPlatform, RemotePayload, Spezi,
};
use spezi_config::{ConfigProvider, ConfigurationExt};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod modules;

/// Composes a small health app and drives it through its lifecycle
#[derive(Parser, Debug)]
#[command(name = "prototype")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log output, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    /// Also configure two modules requiring each other
    #[arg(long)]
    cycle: bool,

    /// Run without the scheduler
    #[arg(long)]
    no_scheduler: bool,

    /// Read simulated samples instead of the sensors
    #[arg(long)]
    simulated: bool,

    /// Skip heart rate collection
    #[arg(long)]
    no_heart_rate: bool,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let spezi = match launch(&cli) {
        Ok(spezi) => spezi,
        Err(e) => {
            eprintln!("Application failed to launch: {e}");
            std::process::exit(1);
        }
    };

    println!("Resolved modules:");
    for id in spezi.module_ids() {
        println!("  {id}");
    }

    run(&spezi);
}

fn launch(cli: &Cli) -> Result<Spezi, LaunchError> {
    let collector_config = CollectorConfig {
        track_heart_rate: !cli.no_heart_rate,
        simulated: cli.simulated,
        sync_interval_minutes: 30,
    };

    let mut config_provider = ConfigProvider::new();
    if let Err(e) = config_provider.add_config(collector_config.clone()) {
        tracing::error!("{e}");
    }

    let mut options = LaunchOptions::new();
    options.insert("source", "cli");

    let mut configuration = Configuration::with_standard(HealthStandard::default())
        .with_config_provider(config_provider)
        .notification_platform(LoggingPlatform)
        .launch_options(options)
        .module(HealthDataCollector::new(&collector_config))
        .module(AccountModule::default())
        .maybe_module((!cli.no_scheduler).then(Scheduler::default))
        .module(OnboardingModule::default());

    if cli.cycle {
        configuration = configuration
            .module(Reminders::default())
            .module(Calendar::default());
    }

    configuration.launch()
}

fn run(spezi: &Spezi) {
    spezi.will_finish_launching();

    if let Some(onboarding) = spezi.environment().get::<OnboardingModule>() {
        if let Some(account) = spezi.module::<AccountModule>() {
            account.sign_in("jane.doe");
        }
        onboarding.complete();

        if let Some(notifications) = onboarding.notifications() {
            let registration = notifications.register();
            notifications.did_register(DeviceToken(vec![0x5e, 0x21, 0xa0]));
            match block_on(registration) {
                Ok(token) => println!("Registered for remote notifications: {token}"),
                Err(e) => eprintln!("Remote notification registration failed: {e}"),
            }
        }
    }

    let mut payload = RemotePayload::new();
    payload.insert("action".to_string(), "sync".to_string());
    let fetched = block_on(spezi.receive_remote_notification(&payload));
    println!("Remote notification result: {fetched:?}");

    let presentation = block_on(spezi.receive_incoming_notification(&Notification {
        identifier: "daily-reminder".to_string(),
        ..Default::default()
    }));
    println!("Presentation: {presentation:?}");

    spezi.handle_lifecycle_event(&LifecycleEvent::SceneDidEnterBackground);
    spezi.handle_lifecycle_event(&LifecycleEvent::ApplicationWillTerminate);

    if let Some(collector) = spezi.module::<HealthDataCollector>() {
        println!(
            "Collector used {} sources, syncing every {:?} minutes",
            collector.source_count(),
            collector.sync_interval()
        );
    }
    if let Some(scheduler) = spezi.module::<Scheduler>() {
        println!("Scheduled tasks: {:?}", scheduler.tasks());
    }
    if let Some(standard) = spezi.standard::<HealthStandard>() {
        println!("Standard received {} samples", standard.samples().len());
    }
}

/// Platform which only logs, registrations are completed by the caller
struct LoggingPlatform;
impl NotificationPlatform for LoggingPlatform {
    fn register_for_remote_notifications(&self) {
        tracing::info!("Requested remote notification registration");
    }

    fn unregister_for_remote_notifications(&self) {
        tracing::info!("Unregistered from remote notifications");
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG takes precedence over the verbosity flag
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use spezi::{BackgroundFetchResult, DependencyError};

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("prototype").chain(args.iter().copied()))
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn launches_with_defaults() {
        let spezi = launch(&cli(&[])).unwrap();

        let ids: Vec<_> = spezi.module_ids().iter().map(|id| id.type_name).collect();
        let position = |name: &str| ids.iter().position(|id| id.ends_with(name)).unwrap();

        assert_eq!(position("HealthStandard"), 0);
        assert!(position("SecureStorage") < position("AccountModule"));
        assert!(position("AccountModule") < position("HealthDataCollector"));
        assert!(position("Scheduler") < position("HealthDataCollector"));
        assert!(spezi.environment().contains::<OnboardingModule>());

        let collector = spezi.module::<HealthDataCollector>().unwrap();
        assert_eq!(collector.source_count(), 2);
        assert_eq!(collector.sync_interval(), Some(30));
        assert_eq!(spezi.module::<Scheduler>().unwrap().tasks().len(), 1);
    }

    #[test]
    fn remote_sync_reaches_the_standard() {
        let spezi = launch(&cli(&["--simulated", "--no-scheduler"])).unwrap();
        assert!(spezi.module::<Scheduler>().is_none());

        let mut payload = RemotePayload::new();
        payload.insert("action".to_string(), "sync".to_string());
        assert_eq!(
            block_on(spezi.receive_remote_notification(&payload)),
            BackgroundFetchResult::NewData
        );

        let standard = spezi.standard::<HealthStandard>().unwrap();
        assert_eq!(standard.samples().len(), 1);
        assert_eq!(standard.samples()[0].kind, "simulated");
    }

    #[test]
    fn cycle_flag_fails_the_launch() {
        let err = launch(&cli(&["--cycle"])).unwrap_err();
        assert!(matches!(
            err,
            LaunchError::Dependency(DependencyError::Cycle { .. })
        ));
    }

    #[test]
    fn onboarding_captures_notifications() {
        let spezi = launch(&cli(&[])).unwrap();
        let onboarding = spezi.environment().get::<OnboardingModule>().unwrap();
        let notifications = onboarding.notifications().unwrap();
        assert!(Arc::ptr_eq(notifications, spezi.remote_notifications()));
    }
}
