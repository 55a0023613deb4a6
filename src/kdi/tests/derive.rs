use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use kdi::prelude::*;

pub trait AppCatalogue: Send + Sync + 'static {
    fn apps(&self) -> Vec<String>;
}

pub struct Settings {
    pub prefix: String,
}

pub struct FakeCatalogue {
    settings: Arc<Settings>,
}

#[component(Arc<dyn AppCatalogue>, Arc::new)]
impl FakeCatalogue {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

impl AppCatalogue for FakeCatalogue {
    fn apps(&self) -> Vec<String> {
        ["clock", "mail"]
            .iter()
            .map(|app| format!("{}{app}", self.settings.prefix))
            .collect()
    }
}

pub struct AppList {
    pub catalogue: Arc<dyn AppCatalogue>,
    pub built_with: &'static str,
}

#[component(scope = Activity)]
impl AppList {
    pub fn empty() -> Self {
        unreachable!("the constructor with parameters should be picked")
    }

    pub fn new(catalogue: Arc<dyn AppCatalogue>) -> Self {
        Self {
            catalogue,
            built_with: "new",
        }
    }

    pub fn with_prefix(catalogue: Arc<dyn AppCatalogue>, _settings: Arc<Settings>) -> Self {
        Self {
            catalogue,
            built_with: "with_prefix",
        }
    }

    pub fn len(&self) -> usize {
        self.catalogue.apps().len()
    }
}

pub struct Launcher {
    pub list: Arc<AppList>,
}

#[component(scope = Fragment)]
impl Launcher {
    pub fn new() -> Self {
        unreachable!("the annotated constructor should be picked")
    }

    #[inject]
    pub fn from_list(list: Arc<AppList>) -> Self {
        Self { list }
    }
}

#[derive(Debug)]
pub struct Unavailable;

impl Display for Unavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "the package manager is unavailable")
    }
}

impl Error for Unavailable {}

pub struct PackageManager;

#[component]
impl PackageManager {
    pub fn connect() -> Result<Self, Unavailable> {
        Err(Unavailable)
    }
}

#[derive(Default, Inject)]
pub struct LauncherScreen {
    #[inject]
    pub list: Option<Arc<AppList>>,
    #[inject]
    pub settings: Option<Arc<Settings>>,
    #[inject]
    pub packages: Option<Arc<PackageManager>>,
    pub title: String,
}

struct LauncherModule;

impl Module for LauncherModule {
    fn configure(
        &self,
        configurer: &mut dyn Configurer,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        bind::<Arc<Settings>>()
            .to_factory(|| {
                Arc::new(Settings {
                    prefix: String::from("app."),
                })
            })
            .set_on(configurer);
        bind::<Arc<dyn AppCatalogue>>()
            .to_component::<FakeCatalogue>()
            .set_on(configurer);
        bind::<Arc<AppList>>().set_on(configurer);
        bind::<Arc<Launcher>>().set_on(configurer);
        configurer.register_component::<PackageManager>();
        Ok(())
    }
}

#[test]
fn component_macro_picks_first_constructor_with_parameters() {
    let container = Container::init(LauncherModule).unwrap();
    let screen = Lifecycle::new();

    let list: Arc<AppList> = container.resolve(Some(&screen)).unwrap();
    assert_eq!(list.built_with, "new");
    assert_eq!(list.catalogue.apps(), ["app.clock", "app.mail"]);
    assert_eq!(list.len(), 2);
}

#[test]
fn component_macro_prefers_annotated_constructor() {
    let container = Container::init(LauncherModule).unwrap();
    let screen = Lifecycle::new();
    let tab = Lifecycle::new();

    let launcher: Arc<Launcher> = container.resolve(Some(&tab)).unwrap();
    let list: Arc<AppList> = container.resolve(Some(&tab)).unwrap();
    let other: Arc<AppList> = container.resolve(Some(&screen)).unwrap();

    assert!(Arc::ptr_eq(&launcher.list, &list));
    assert!(!Arc::ptr_eq(&list, &other));
}

#[test]
fn component_macro_reports_constructor_error() {
    let container = Container::init(LauncherModule).unwrap();

    let Err(err) = container.get::<Arc<PackageManager>>() else {
        panic!("the constructor should fail");
    };
    assert!(matches!(err, InjectorError::ObjectConstruction { .. }));
    assert_eq!(err.key(), key::of::<Arc<PackageManager>>());
    assert_eq!(
        err.source().map(ToString::to_string).as_deref(),
        Some("the package manager is unavailable")
    );
}

#[test]
fn inject_derive_assigns_fields_in_order_and_stops_at_failure() {
    let container = Container::init(LauncherModule).unwrap();
    let screen = Lifecycle::new();
    let mut target = LauncherScreen {
        title: String::from("Apps"),
        ..Default::default()
    };

    let res = container.inject(&mut target, Some(&screen));

    assert!(matches!(res, Err(InjectorError::ObjectConstruction { .. })));
    assert!(target.list.is_some());
    assert!(target.settings.is_some());
    assert!(target.packages.is_none());
    assert_eq!(target.title, "Apps");
}

#[test]
fn inject_derive_uses_owner_scope() {
    let container = Container::init(LauncherModule).unwrap();
    let screen = Lifecycle::new();
    let mut target = LauncherScreen::default();

    let _ = container.with_owner(&screen).inject(&mut target);
    let list: Arc<AppList> = container.resolve(Some(&screen)).unwrap();

    let Some(injected) = &target.list else {
        panic!("the list should be injected");
    };
    assert!(Arc::ptr_eq(injected, &list));
}
