use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use view_stack::{GroupLayerFactory, ViewController, ViewError, ViewFactory, ViewManager};

struct PlainView {
    id: u32,
    name: String,
    group: String,
}

impl ViewController<u32> for PlainView {
    fn view_id(&self) -> u32 {
        self.id
    }

    fn view_name(&self) -> &str {
        &self.name
    }

    fn group_name(&self) -> &str {
        &self.group
    }

    fn is_active(&self) -> bool {
        true
    }

    fn set_active(&mut self, _active: bool) {}
}

struct CatalogFactory {
    entries: Vec<(u32, &'static str, &'static str)>,
}

impl ViewFactory<u32> for CatalogFactory {
    fn create_controller(
        &mut self,
        view_id: u32,
        _user_data: Option<&dyn Any>,
    ) -> Box<dyn ViewController<u32>> {
        let entry = self
            .entries
            .iter()
            .copied()
            .find(|entry| entry.0 == view_id)
            .unwrap_or((view_id, "unknown", "unknown"));
        Box::new(PlainView {
            id: entry.0,
            name: entry.1.to_owned(),
            group: entry.2.to_owned(),
        })
    }

    fn view_name_of(&self, view_id: u32) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| entry.0 == view_id)
            .map(|entry| entry.1.to_owned())
    }

    fn group_name_of(&self, view_id: u32) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| entry.0 == view_id)
            .map(|entry| entry.2.to_owned())
    }
}

struct LayerSpy {
    created: Rc<RefCell<Vec<(String, i32)>>>,
}

impl GroupLayerFactory for LayerSpy {
    fn create_group_layer(&mut self, name: &str, depth: i32) {
        self.created.borrow_mut().push((name.to_owned(), depth));
    }
}

fn fixture() -> (ViewManager<u32>, Rc<RefCell<Vec<(String, i32)>>>) {
    let created = Rc::new(RefCell::new(Vec::new()));
    let factory = CatalogFactory {
        entries: vec![
            (1, "hud", "overlay"),
            (2, "menu", "screen"),
            (5, "dup", "screen"),
            (6, "dup", "overlay"),
        ],
    };
    let manager = ViewManager::new(
        Box::new(factory),
        Box::new(LayerSpy {
            created: created.clone(),
        }),
    );
    (manager, created)
}

#[test]
fn add_group_is_idempotent_and_first_depth_wins() {
    let (mut manager, layers) = fixture();

    assert!(manager.add_group("hud_layer", 5).unwrap());
    assert!(!manager.add_group("hud_layer", 9).unwrap());

    assert_eq!(manager.group_count(), 1);
    assert_eq!(manager.group("hud_layer").unwrap().unwrap().depth(), 5);
    // the layer factory runs exactly once, with the original depth
    assert_eq!(*layers.borrow(), vec![("hud_layer".to_owned(), 5)]);
}

#[test]
fn group_depth_is_mutable_after_creation() {
    let (mut manager, layers) = fixture();
    manager.add_group("popup", 3).unwrap();

    let group = manager.group_mut("popup").unwrap().unwrap();
    group.set_depth(7);
    assert_eq!(manager.group("popup").unwrap().unwrap().depth(), 7);
    // depth changes do not re-create the layer
    assert_eq!(layers.borrow().len(), 1);
}

#[test]
fn empty_names_are_rejected_everywhere() {
    let (mut manager, _) = fixture();

    assert_eq!(manager.has_group(""), Err(ViewError::EmptyName));
    assert_eq!(manager.add_group("", 0), Err(ViewError::EmptyName));
    assert!(manager.group("").is_err());
    assert_eq!(manager.has_view_named(""), Err(ViewError::EmptyName));
    assert!(manager.view_named("").is_err());
    assert!(manager.view_named_mut("").is_err());
}

#[test]
fn opened_event_carries_the_full_tuple() {
    let (mut manager, _) = fixture();
    manager.add_group("overlay", 10).unwrap();

    let seen: Rc<RefCell<Vec<(u32, String, String, String)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    manager.on_view_opened(move |event| {
        let note = event
            .user_data
            .and_then(|data| data.downcast_ref::<&str>())
            .copied()
            .unwrap_or("-");
        sink.borrow_mut().push((
            event.view_id,
            event.view_name.to_owned(),
            event.group_name.to_owned(),
            note.to_owned(),
        ));
    });

    let note: &str = "hello";
    manager.open_view(1, Some(&note), true).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0],
        (1, "hud".to_owned(), "overlay".to_owned(), "hello".to_owned())
    );
}

#[test]
fn closed_event_fires_once_and_never_carries_user_data() {
    let (mut manager, _) = fixture();
    manager.add_group("overlay", 10).unwrap();

    let seen: Rc<RefCell<Vec<(u32, String, String, bool)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    manager.on_view_closed(move |event| {
        sink.borrow_mut().push((
            event.view_id,
            event.view_name.to_owned(),
            event.group_name.to_owned(),
            event.user_data.is_none(),
        ));
    });

    let note: &str = "hello";
    manager.open_view(1, Some(&note), false).unwrap();
    manager.close_view(1, false).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    // user data from the open never reaches the close notification
    assert_eq!(
        seen[0],
        (1, "hud".to_owned(), "overlay".to_owned(), true)
    );
}

#[test]
fn listeners_run_in_subscription_order_and_unsubscribe_sticks() {
    let (mut manager, _) = fixture();
    manager.add_group("overlay", 10).unwrap();

    let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let first_sink = order.clone();
    let first = manager.on_view_opened(move |_event| first_sink.borrow_mut().push("first"));
    let second_sink = order.clone();
    manager.on_view_opened(move |_event| second_sink.borrow_mut().push("second"));

    manager.open_view(1, None, false).unwrap();
    assert_eq!(*order.borrow(), vec!["first", "second"]);

    assert!(manager.unsubscribe_opened(first));
    assert!(!manager.unsubscribe_opened(first));
    order.borrow_mut().clear();

    manager.open_view(1, None, false).unwrap();
    assert_eq!(*order.borrow(), vec!["second"]);
}

#[test]
fn name_lookup_is_first_match_across_groups() {
    let (mut manager, _) = fixture();
    manager.add_group("screen", 0).unwrap();
    manager.add_group("overlay", 10).unwrap();
    manager.open_view(5, None, false).unwrap();
    manager.open_view(6, None, false).unwrap();

    // duplicate names are allowed; the scan answers for whichever group
    // comes first in name order ("overlay" before "screen")
    assert!(manager.has_view_named("dup").unwrap());
    let found = manager.view_named("dup").unwrap().unwrap();
    assert_eq!(found.view_id(), 6);
    let found_mut = manager.view_named_mut("dup").unwrap().unwrap();
    assert_eq!(found_mut.view_id(), 6);

    assert!(!manager.has_view_named("absent").unwrap());
    assert!(manager.view_named("absent").unwrap().is_none());
}

#[test]
fn group_lookup_misses_are_not_errors() {
    let (manager, _) = fixture();
    assert!(!manager.has_group("void").unwrap());
    assert!(manager.group("void").unwrap().is_none());
    // unresolvable view ids are simply "not registered"
    assert!(!manager.has_view(42));
    assert!(manager.view(42).is_none());
}
