use std::any::Any;
use std::time::Duration;

use clap::Parser;
use tracing::Level;

use view_stack::{
    GroupLayerFactory, ResourceManager, ViewController, ViewError, ViewFactory, ViewManager,
};

const VIEW_HUD: u32 = 1;
const VIEW_MENU: u32 = 2;
const VIEW_TOAST: u32 = 3;

/// Scripted demo of the view lifecycle manager: registers two groups, opens
/// and closes a few views over a simulated frame loop, and logs every
/// transition.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Milliseconds of logical time per simulated frame
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Log at debug level (includes the manager's own events)
    #[arg(long)]
    verbose: bool,
}

fn catalog(view_id: u32) -> Option<(&'static str, &'static str, bool)> {
    // (view name, group name, locked)
    match view_id {
        VIEW_HUD => Some(("hud", "overlay", true)),
        VIEW_MENU => Some(("main_menu", "screen", false)),
        VIEW_TOAST => Some(("toast", "overlay", false)),
        _ => None,
    }
}

struct DemoView {
    id: u32,
    name: &'static str,
    group: &'static str,
    locked: bool,
    active: bool,
    updates: u64,
}

impl ViewController<u32> for DemoView {
    fn view_id(&self) -> u32 {
        self.id
    }

    fn view_name(&self) -> &str {
        self.name
    }

    fn group_name(&self) -> &str {
        self.group
    }

    fn package_name(&self) -> &str {
        "demo_pkg"
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn on_init(&mut self) {
        tracing::info!(view = self.name, "init");
    }

    fn on_show(&mut self, user_data: Option<&dyn Any>) {
        let note = user_data
            .and_then(|data| data.downcast_ref::<&str>())
            .copied()
            .unwrap_or("-");
        tracing::info!(view = self.name, note, "show");
    }

    fn on_open(&mut self, animated: bool) {
        tracing::info!(view = self.name, animated, "open");
    }

    fn on_close(&mut self, animated: bool) {
        tracing::info!(view = self.name, animated, updates = self.updates, "close");
    }

    fn on_update(&mut self, _dt: Duration, _real_dt: Duration) {
        self.updates += 1;
    }
}

struct DemoFactory;

impl ViewFactory<u32> for DemoFactory {
    fn create_controller(
        &mut self,
        view_id: u32,
        _user_data: Option<&dyn Any>,
    ) -> Box<dyn ViewController<u32>> {
        let (name, group, locked) = catalog(view_id).unwrap_or(("unknown", "screen", false));
        Box::new(DemoView {
            id: view_id,
            name,
            group,
            locked,
            active: true,
            updates: 0,
        })
    }

    fn view_name_of(&self, view_id: u32) -> Option<String> {
        catalog(view_id).map(|(name, _, _)| name.to_owned())
    }

    fn group_name_of(&self, view_id: u32) -> Option<String> {
        catalog(view_id).map(|(_, group, _)| group.to_owned())
    }
}

struct LayerLog;

impl GroupLayerFactory for LayerLog {
    fn create_group_layer(&mut self, name: &str, depth: i32) {
        tracing::info!(layer = name, depth, "created group layer");
    }
}

struct PackageLog;

impl ResourceManager for PackageLog {
    fn load_package(&mut self, package: &str) {
        tracing::info!(package, "loaded package");
    }

    fn unload_package(&mut self, package: &str) {
        tracing::info!(package, "unloaded package");
    }
}

fn main() -> Result<(), ViewError> {
    let cli = Cli::parse();
    view_stack::tracing_sub::init_with_level(if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    });

    let mut manager = ViewManager::new(Box::new(DemoFactory), Box::new(LayerLog));
    manager.set_resource_manager(Box::new(PackageLog));
    if let Some(resources) = manager.resource_manager() {
        resources.load_package("demo_pkg");
    }

    manager.add_group("screen", 0)?;
    manager.add_group("overlay", 10)?;

    manager.on_view_opened(|event| {
        tracing::info!(view = event.view_name, group = event.group_name, "view opened");
    });
    manager.on_view_closed(|event| {
        tracing::info!(view = event.view_name, group = event.group_name, "view closed");
    });

    let note: &str = "from the demo script";
    manager.open_view(VIEW_MENU, Some(&note), true)?;
    manager.open_view(VIEW_HUD, None, false)?;

    let tick = Duration::from_millis(cli.tick_ms);
    for frame in 0..cli.frames {
        if frame == cli.frames / 3 {
            manager.open_view(VIEW_TOAST, None, false)?;
        }
        if frame == cli.frames / 2 {
            // hud is locked: this fires on_close but keeps it registered
            manager.close_view(VIEW_HUD, true)?;
        }
        if frame == cli.frames * 2 / 3 {
            // reopen takes the existing-instance path, no new allocation
            manager.open_view(VIEW_HUD, None, true)?;
        }
        manager.update(tick, tick);
    }

    manager.close_all_views()?;
    if let Some(resources) = manager.resource_manager() {
        resources.unload_package("demo_pkg");
    }
    manager.shutdown();
    Ok(())
}
