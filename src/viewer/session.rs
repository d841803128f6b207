//! Full-screen viewer state machine.
//!
//! States: Closed, Open-Single (one photo at the current index) and
//! Open-Continuous (every governed photo in sequence). A session exists only
//! while the viewer is open and is discarded on close.

use std::sync::Arc;

use tracing::{debug, trace};

use super::context::{self, HostView, NavigationContext};
use super::input::{intent_for_click, intent_for_key, DragTracker, ViewerInput, ViewerIntent};
use crate::config::ViewerConfig;
use crate::display;
use crate::error::Result;
use crate::models::PhotoItem;
use crate::surface::HostSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Closed,
    OpenSingle,
    OpenContinuous,
}

/// Transient state of one open viewer.
#[derive(Debug, Clone)]
pub struct ViewerSession {
    context: NavigationContext,
    items: Vec<PhotoItem>,
    index: usize,
    continuous: bool,
}

impl ViewerSession {
    pub fn context(&self) -> &NavigationContext {
        &self.context
    }

    /// The governing array.
    pub fn items(&self) -> &[PhotoItem] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn current(&self) -> &PhotoItem {
        &self.items[self.index]
    }
}

/// Result of feeding one input to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    /// Nothing changed.
    Ignored,
    Navigated { index: usize },
    ModeChanged { continuous: bool },
    CaptionsToggled { visible: bool },
    /// The viewer closed; the host should restore this view.
    Closed(HostView),
}

pub struct Viewer {
    config: ViewerConfig,
    surface: Arc<dyn HostSurface>,
    session: Option<ViewerSession>,
    captions_visible: bool,
    drag: DragTracker,
}

impl Viewer {
    /// Creates a closed viewer drawing on `surface`.
    ///
    /// Fails with `FolioError::InvalidConfig` if `config` does not validate.
    pub fn new(config: ViewerConfig, surface: Arc<dyn HostSurface>) -> Result<Self> {
        config.validate()?;
        let drag = DragTracker::new(config.swipe_threshold, config.vertical_threshold);
        Ok(Self {
            captions_visible: config.captions_visible,
            config,
            surface,
            session: None,
            drag,
        })
    }

    pub fn state(&self) -> ViewerState {
        match &self.session {
            None => ViewerState::Closed,
            Some(session) if session.continuous => ViewerState::OpenContinuous,
            Some(_) => ViewerState::OpenSingle,
        }
    }

    pub fn session(&self) -> Option<&ViewerSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn captions_visible(&self) -> bool {
        self.captions_visible
    }

    /// The photo at the current index, if open.
    pub fn current(&self) -> Option<&PhotoItem> {
        self.session.as_ref().map(|s| s.current())
    }

    /// Position text for the current session, if open.
    pub fn indicator(&self) -> Option<String> {
        self.session.as_ref().map(display::indicator)
    }

    /// Opens the viewer on `item`, activated from `host_view`.
    ///
    /// Opening while already open replaces the session.
    pub fn open(
        &mut self,
        item: &PhotoItem,
        batch: &[PhotoItem],
        is_series: bool,
        host_view: &HostView,
    ) -> &ViewerSession {
        let selection = context::select(
            item,
            batch,
            is_series,
            host_view,
            self.config.max_series_size,
        );
        if self.session.is_none() {
            self.surface.set_background_scroll(false);
        }
        self.drag.cancel();
        debug!(
            id = %item.id,
            kind = ?selection.context.kind(),
            index = selection.index,
            len = selection.items.len(),
            "Opened viewer"
        );
        self.session.insert(ViewerSession {
            context: selection.context,
            items: selection.items,
            index: selection.index,
            continuous: false,
        })
    }

    /// Closes the viewer and returns the view recorded at open time.
    pub fn close(&mut self) -> Option<HostView> {
        let session = self.session.take()?;
        self.drag.cancel();
        self.surface.set_background_scroll(true);
        debug!("Closed viewer");
        Some(session.context.into_return_view())
    }

    /// Moves by `step` within the governing array.
    ///
    /// Only valid in single mode; out-of-range moves leave the index unchanged.
    pub fn navigate(&mut self, step: isize) -> bool {
        let Some(session) = self.session.as_mut() else {
            trace!("Navigate ignored: viewer closed");
            return false;
        };
        if session.continuous {
            trace!("Navigate ignored in continuous mode");
            return false;
        }
        let target = session.index as isize + step;
        if target < 0 || target >= session.items.len() as isize {
            trace!(index = session.index, step, "Navigate out of range");
            return false;
        }
        session.index = target as usize;
        debug!(index = session.index, "Navigated");
        true
    }

    /// Switches between single and continuous mode.
    ///
    /// Only permitted when more than one photo is governed.
    pub fn toggle_continuous(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.items.len() <= 1 {
            trace!("Continuous mode needs more than one photo");
            return false;
        }
        session.continuous = !session.continuous;
        debug!(continuous = session.continuous, "Toggled continuous mode");
        true
    }

    /// Picks a photo while in continuous mode, returning to single mode on it.
    pub fn select_in_continuous(&mut self, index: usize) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.continuous || index >= session.items.len() {
            trace!(index, "Continuous selection ignored");
            return false;
        }
        session.index = index;
        session.continuous = false;
        debug!(index, "Selected photo from continuous mode");
        true
    }

    /// Shows or hides captions. Independent of the open state.
    pub fn toggle_captions(&mut self) -> bool {
        self.captions_visible = !self.captions_visible;
        self.captions_visible
    }

    /// Applies an intent decoded from input.
    pub fn apply(&mut self, intent: ViewerIntent) -> ViewerAction {
        if !self.is_open() {
            return ViewerAction::Ignored;
        }
        match intent {
            ViewerIntent::Navigate(step) => {
                if self.navigate(step) {
                    self.navigated()
                } else {
                    ViewerAction::Ignored
                }
            }
            ViewerIntent::ToggleContinuous => {
                if self.toggle_continuous() {
                    ViewerAction::ModeChanged {
                        continuous: self.state() == ViewerState::OpenContinuous,
                    }
                } else {
                    ViewerAction::Ignored
                }
            }
            ViewerIntent::Select(index) => {
                if self.select_in_continuous(index) {
                    self.navigated()
                } else {
                    ViewerAction::Ignored
                }
            }
            ViewerIntent::ToggleCaptions => ViewerAction::CaptionsToggled {
                visible: self.toggle_captions(),
            },
            ViewerIntent::Close => self
                .close()
                .map(ViewerAction::Closed)
                .unwrap_or(ViewerAction::Ignored),
        }
    }

    fn navigated(&self) -> ViewerAction {
        self.session
            .as_ref()
            .map(|s| ViewerAction::Navigated { index: s.index })
            .unwrap_or(ViewerAction::Ignored)
    }

    /// Feeds raw host input through the key, click and gesture mappings.
    pub fn handle_input(&mut self, input: ViewerInput) -> ViewerAction {
        if !self.is_open() {
            return ViewerAction::Ignored;
        }
        let intent = match input {
            ViewerInput::Key(key) => intent_for_key(key),
            ViewerInput::Click(region) => intent_for_click(region),
            ViewerInput::PressStart { x, y } => {
                self.drag.press(x, y);
                None
            }
            ViewerInput::PressEnd { x, y } => {
                let count = self.session.as_ref().map_or(0, |s| s.len());
                self.drag.release(x, y, count)
            }
            ViewerInput::PressCancel => {
                self.drag.cancel();
                None
            }
        };
        match intent {
            Some(intent) => self.apply(intent),
            None => ViewerAction::Ignored,
        }
    }

    /// Closes any open session. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.close();
        self.drag.cancel();
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::photo_item::fixtures::photo;
    use crate::surface::HeadlessSurface;
    use crate::viewer::input::{HitRegion, Key};

    fn batch() -> Vec<PhotoItem> {
        (0..4).map(|i| photo(&format!("p{i}"), "alice")).collect()
    }

    fn viewer() -> (Viewer, Arc<HeadlessSurface>) {
        let surface = Arc::new(HeadlessSurface::new(1200.0));
        (
            Viewer::new(ViewerConfig::default(), surface.clone()).unwrap(),
            surface,
        )
    }

    #[test]
    fn test_open_and_close_manage_background_scroll() {
        let (mut viewer, surface) = viewer();
        let batch = batch();
        assert_eq!(viewer.state(), ViewerState::Closed);

        viewer.open(&batch[2], &batch, false, &HostView::Feed);
        assert_eq!(viewer.state(), ViewerState::OpenSingle);
        assert_eq!(viewer.session().unwrap().index(), 2);
        assert!(!surface.background_scroll());

        assert_eq!(viewer.close(), Some(HostView::Feed));
        assert_eq!(viewer.state(), ViewerState::Closed);
        assert!(surface.background_scroll());
        assert!(viewer.close().is_none());
    }

    #[test]
    fn test_navigate_stays_in_bounds() {
        let (mut viewer, _) = viewer();
        let batch = batch();
        viewer.open(&batch[0], &batch, false, &HostView::Feed);

        assert!(!viewer.navigate(-1));
        assert_eq!(viewer.session().unwrap().index(), 0);

        assert!(viewer.navigate(1));
        assert!(viewer.navigate(1));
        assert!(viewer.navigate(1));
        assert!(!viewer.navigate(1));
        assert_eq!(viewer.session().unwrap().index(), 3);
        assert_eq!(viewer.current().unwrap().id.as_str(), "p3");
        assert!(!viewer.navigate(5));
        assert_eq!(viewer.session().unwrap().index(), 3);
    }

    #[test]
    fn test_navigate_when_closed_is_noop() {
        let (mut viewer, _) = viewer();
        assert!(!viewer.navigate(1));
        assert!(!viewer.toggle_continuous());
    }

    #[test]
    fn test_indicator_names_collection() {
        let (mut viewer, _) = viewer();
        let batch = batch();
        viewer.open(&batch[1], &batch, false, &HostView::Feed);
        assert_eq!(viewer.indicator().as_deref(), Some("2 / 4"));

        let author = HostView::Author {
            author_id: "alice".into(),
            author_name: "Alice".into(),
        };
        viewer.open(&batch[0], &batch, false, &author);
        assert_eq!(viewer.indicator().as_deref(), Some("alice name 1 / 4"));

        let members: Vec<PhotoItem> = (0..7).map(|i| photo(&format!("s{i}"), "x")).collect();
        let parent = photo("s0", "x").with_series(members);
        viewer.open(&parent, &batch, true, &HostView::Feed);
        assert_eq!(viewer.indicator().as_deref(), Some("Series 1 / 5"));
    }

    #[test]
    fn test_series_open_is_capped() {
        let (mut viewer, _) = viewer();
        let members: Vec<PhotoItem> = (0..7).map(|i| photo(&format!("s{i}"), "x")).collect();
        let parent = photo("s0", "x").with_series(members);

        let session = viewer.open(&parent, &[], true, &HostView::Feed);
        assert_eq!(session.len(), 5);
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_toggle_continuous_round_trip_keeps_index() {
        let (mut viewer, _) = viewer();
        let batch = batch();
        viewer.open(&batch[2], &batch, false, &HostView::Feed);

        assert!(viewer.toggle_continuous());
        assert_eq!(viewer.state(), ViewerState::OpenContinuous);
        assert!(!viewer.navigate(1));
        assert!(viewer.toggle_continuous());
        assert_eq!(viewer.state(), ViewerState::OpenSingle);
        assert_eq!(viewer.session().unwrap().index(), 2);
    }

    #[test]
    fn test_continuous_needs_multiple_items() {
        let (mut viewer, _) = viewer();
        let lonely = photo("solo", "x");
        viewer.open(&lonely, &[], false, &HostView::Feed);
        assert_eq!(viewer.session().unwrap().len(), 1);
        assert!(!viewer.toggle_continuous());
        assert_eq!(viewer.state(), ViewerState::OpenSingle);
    }

    #[test]
    fn test_select_in_continuous_returns_to_single() {
        let (mut viewer, _) = viewer();
        let batch = batch();
        viewer.open(&batch[0], &batch, false, &HostView::Feed);

        assert!(!viewer.select_in_continuous(2));
        viewer.toggle_continuous();
        assert!(!viewer.select_in_continuous(9));
        assert!(viewer.select_in_continuous(3));
        assert_eq!(viewer.state(), ViewerState::OpenSingle);
        assert_eq!(viewer.session().unwrap().index(), 3);
    }

    #[test]
    fn test_captions_toggle_is_orthogonal() {
        let (mut viewer, _) = viewer();
        let batch = batch();
        viewer.open(&batch[1], &batch, false, &HostView::Feed);
        viewer.toggle_continuous();

        assert!(!viewer.toggle_captions());
        assert_eq!(viewer.state(), ViewerState::OpenContinuous);
        assert_eq!(viewer.session().unwrap().index(), 1);
        assert!(viewer.toggle_captions());
    }

    #[test]
    fn test_keyboard_and_clicks() {
        let (mut viewer, _) = viewer();
        let batch = batch();
        let view = HostView::Portfolio {
            author_id: "alice".into(),
        };
        viewer.open(&batch[0], &batch, false, &view);

        assert_eq!(
            viewer.handle_input(ViewerInput::Key(Key::Right)),
            ViewerAction::Navigated { index: 1 }
        );
        assert_eq!(
            viewer.handle_input(ViewerInput::Key(Key::Up)),
            ViewerAction::ModeChanged { continuous: true }
        );
        assert_eq!(
            viewer.handle_input(ViewerInput::Click(HitRegion::ContinuousItem(3))),
            ViewerAction::Navigated { index: 3 }
        );
        assert_eq!(
            viewer.handle_input(ViewerInput::Click(HitRegion::Photo)),
            ViewerAction::Ignored
        );
        assert_eq!(
            viewer.handle_input(ViewerInput::Click(HitRegion::Backdrop)),
            ViewerAction::Closed(view)
        );
        assert_eq!(
            viewer.handle_input(ViewerInput::Key(Key::Left)),
            ViewerAction::Ignored
        );
    }

    #[test]
    fn test_swipes() {
        let (mut viewer, _) = viewer();
        let batch = batch();
        viewer.open(&batch[1], &batch, false, &HostView::Feed);

        viewer.handle_input(ViewerInput::PressStart { x: 400.0, y: 300.0 });
        assert_eq!(
            viewer.handle_input(ViewerInput::PressEnd { x: 250.0, y: 310.0 }),
            ViewerAction::Navigated { index: 2 }
        );

        viewer.handle_input(ViewerInput::PressStart { x: 400.0, y: 500.0 });
        assert_eq!(
            viewer.handle_input(ViewerInput::PressEnd { x: 400.0, y: 300.0 }),
            ViewerAction::ModeChanged { continuous: true }
        );
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (mut viewer, surface) = viewer();
        let batch = batch();
        viewer.open(&batch[0], &batch, false, &HostView::Feed);
        viewer.destroy();
        viewer.destroy();
        assert_eq!(viewer.state(), ViewerState::Closed);
        assert!(surface.background_scroll());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ViewerConfig {
            max_series_size: 0,
            ..Default::default()
        };
        let result = Viewer::new(config, Arc::new(HeadlessSurface::new(800.0)));
        assert!(matches!(result, Err(crate::error::FolioError::InvalidConfig(_))));
    }

    #[test]
    fn test_close_returns_author_view_after_continuous() {
        let (mut viewer, _) = viewer();
        let batch = batch();
        let view = HostView::Author {
            author_id: "alice".into(),
            author_name: "Alice".into(),
        };
        viewer.open(&batch[1], &batch, false, &view);
        viewer.toggle_continuous();

        assert_eq!(viewer.close(), Some(view));
        assert_eq!(viewer.state(), ViewerState::Closed);
    }
}
