//! A console stand-in for a home-screen launcher: one screen lists the
//! installed apps of a fake catalogue, and a details pane is opened for the
//! app the user picks.
//!
//! Run with `RUST_LOG=kdi=debug` to watch objects being constructed and torn
//! down.

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kdi::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let container = Container::init(LauncherModule::new(vec![
        AppInfo::new("Clock", "org.example.clock"),
        AppInfo::new("Mail", "org.example.mail"),
        AppInfo::new("Notes", "org.example.notes"),
    ]))?;

    let home = Lifecycle::new();
    let mut screen = HomeScreen::default();
    container.inject(&mut screen, Some(&home))?;
    screen.show();

    let pane = Lifecycle::new();
    let details: Arc<DetailsPane> = container.resolve(Some(&pane))?;
    details.launch("org.example.mail");
    pane.terminate();

    let again: Arc<AppListPresenter> = container.resolve(Some(&home))?;
    info!(
        same_presenter = screen.presenter.as_ref().is_some_and(|p| Arc::ptr_eq(p, &again)),
        "home screen still alive"
    );

    home.terminate();
    info!(active = container.is_owner_active(home.id()), "home screen closed");

    let launcher: Arc<dyn AppLauncher> = container.get()?;
    info!(launched = launcher.launched(), "done");
    Ok(())
}

#[derive(Debug, Clone)]
struct AppInfo {
    label: &'static str,
    package: &'static str,
}

impl AppInfo {
    fn new(label: &'static str, package: &'static str) -> Self {
        Self { label, package }
    }
}

trait AppCatalogue: Send + Sync + 'static {
    fn installed(&self) -> Vec<AppInfo>;
}

struct FakeCatalogue {
    apps: Vec<AppInfo>,
}

impl AppCatalogue for FakeCatalogue {
    fn installed(&self) -> Vec<AppInfo> {
        self.apps.clone()
    }
}

trait AppLauncher: Send + Sync + 'static {
    fn launch(&self, package: &str);

    fn launched(&self) -> usize;
}

struct ConsoleLauncher {
    catalogue: Arc<dyn AppCatalogue>,
    launched: AtomicUsize,
}

#[component(Arc<dyn AppLauncher>, Arc::new)]
impl ConsoleLauncher {
    fn new(catalogue: Arc<dyn AppCatalogue>) -> Self {
        Self {
            catalogue,
            launched: AtomicUsize::new(0),
        }
    }
}

impl AppLauncher for ConsoleLauncher {
    fn launch(&self, package: &str) {
        let app = self
            .catalogue
            .installed()
            .into_iter()
            .find(|app| app.package == package);
        match app {
            Some(app) => {
                self.launched.fetch_add(1, Ordering::SeqCst);
                info!(label = app.label, package, "launching app");
            }
            None => info!(package, "app is not installed"),
        }
    }

    fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }
}

struct AppListPresenter {
    catalogue: Arc<dyn AppCatalogue>,
}

#[component(scope = Activity)]
impl AppListPresenter {
    fn new(catalogue: Arc<dyn AppCatalogue>) -> Self {
        Self { catalogue }
    }

    fn labels(&self) -> Vec<&'static str> {
        self.catalogue
            .installed()
            .iter()
            .map(|app| app.label)
            .collect()
    }
}

struct DetailsPane {
    launcher: Arc<dyn AppLauncher>,
}

#[component(scope = Fragment)]
impl DetailsPane {
    fn new(launcher: Arc<dyn AppLauncher>) -> Self {
        Self { launcher }
    }

    fn launch(&self, package: &str) {
        self.launcher.launch(package);
    }
}

#[derive(Default, Inject)]
struct HomeScreen {
    #[inject]
    presenter: Option<Arc<AppListPresenter>>,
}

impl HomeScreen {
    fn show(&self) {
        if let Some(presenter) = &self.presenter {
            info!(apps = ?presenter.labels(), "home screen shown");
        }
    }
}

struct LauncherModule {
    apps: Vec<AppInfo>,
}

impl LauncherModule {
    fn new(apps: Vec<AppInfo>) -> Self {
        Self { apps }
    }
}

impl Module for LauncherModule {
    fn configure(
        &self,
        configurer: &mut dyn Configurer,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let catalogue: Arc<dyn AppCatalogue> = Arc::new(FakeCatalogue {
            apps: self.apps.clone(),
        });
        bind::<Arc<dyn AppCatalogue>>()
            .to_instance(catalogue)
            .set_on(configurer);

        bind::<Arc<dyn AppLauncher>>()
            .to_component::<ConsoleLauncher>()
            .set_on(configurer);

        bind::<Arc<AppListPresenter>>().set_on(configurer);
        bind::<Arc<DetailsPane>>().set_on(configurer);

        Ok(())
    }
}
