// Input mapping for the viewer
// Translates abstract key, pointer and touch events into viewer intents
//
// Keybindings:
// - Left / h: Previous photo
// - Right / l: Next photo
// - Up / k: Toggle continuous mode
// - i: Toggle captions
// - Escape / q: Close viewer
//
// Gestures:
// - Horizontal drag past the swipe threshold: previous/next
// - Vertical drag past the vertical threshold: toggle continuous mode

/// Host-independent key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Char(char),
}

/// Where a click or tap landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// The displayed photo itself.
    Photo,
    PrevButton,
    NextButton,
    CloseButton,
    ContinuousToggle,
    CaptionToggle,
    /// Caption panel or any other passive chrome.
    Chrome,
    /// One of the photos listed in continuous mode.
    ContinuousItem(usize),
    /// Outside every interactive sub-region.
    Backdrop,
}

/// Raw input delivered by the host surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerInput {
    Key(Key),
    Click(HitRegion),
    /// Pointer or touch went down at (x, y).
    PressStart { x: f32, y: f32 },
    /// Pointer or touch was released at (x, y).
    PressEnd { x: f32, y: f32 },
    PressCancel,
}

/// What the viewer should do in response to an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerIntent {
    Navigate(isize),
    ToggleContinuous,
    ToggleCaptions,
    Close,
    Select(usize),
}

/// Maps a key to an intent.
pub fn intent_for_key(key: Key) -> Option<ViewerIntent> {
    match key {
        Key::Left | Key::Char('h') => Some(ViewerIntent::Navigate(-1)),
        Key::Right | Key::Char('l') => Some(ViewerIntent::Navigate(1)),
        Key::Up | Key::Char('k') => Some(ViewerIntent::ToggleContinuous),
        Key::Char('i') | Key::Char('I') => Some(ViewerIntent::ToggleCaptions),
        Key::Escape | Key::Char('q') => Some(ViewerIntent::Close),
        _ => None,
    }
}

/// Maps a click to an intent.
pub fn intent_for_click(region: HitRegion) -> Option<ViewerIntent> {
    match region {
        HitRegion::PrevButton => Some(ViewerIntent::Navigate(-1)),
        HitRegion::NextButton => Some(ViewerIntent::Navigate(1)),
        HitRegion::CloseButton | HitRegion::Backdrop => Some(ViewerIntent::Close),
        HitRegion::ContinuousToggle => Some(ViewerIntent::ToggleContinuous),
        HitRegion::CaptionToggle => Some(ViewerIntent::ToggleCaptions),
        HitRegion::ContinuousItem(index) => Some(ViewerIntent::Select(index)),
        HitRegion::Photo | HitRegion::Chrome => None,
    }
}

/// Tracks one drag or swipe from press to release.
#[derive(Debug, Clone)]
pub struct DragTracker {
    origin: Option<(f32, f32)>,
    swipe_threshold: f32,
    vertical_threshold: f32,
}

impl DragTracker {
    pub fn new(swipe_threshold: f32, vertical_threshold: f32) -> Self {
        Self {
            origin: None,
            swipe_threshold,
            vertical_threshold,
        }
    }

    pub fn press(&mut self, x: f32, y: f32) {
        self.origin = Some((x, y));
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    /// Classifies the gesture ending at (x, y).
    ///
    /// Pushing the photo left (release left of the press) moves forward.
    /// Vertical gestures only count when more than one item is governed.
    pub fn release(&mut self, x: f32, y: f32, item_count: usize) -> Option<ViewerIntent> {
        let (start_x, start_y) = self.origin.take()?;
        let dx = start_x - x;
        let dy = start_y - y;

        if dx.abs() >= dy.abs() {
            if dx.abs() >= self.swipe_threshold {
                return Some(ViewerIntent::Navigate(if dx > 0.0 { 1 } else { -1 }));
            }
        } else if dy.abs() >= self.vertical_threshold && item_count > 1 {
            return Some(ViewerIntent::ToggleContinuous);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(intent_for_key(Key::Left), Some(ViewerIntent::Navigate(-1)));
        assert_eq!(intent_for_key(Key::Char('l')), Some(ViewerIntent::Navigate(1)));
        assert_eq!(
            intent_for_key(Key::Up),
            Some(ViewerIntent::ToggleContinuous)
        );
        assert_eq!(intent_for_key(Key::Escape), Some(ViewerIntent::Close));
        assert_eq!(intent_for_key(Key::Char('x')), None);
        assert_eq!(intent_for_key(Key::Down), None);
    }

    #[test]
    fn test_click_mapping() {
        assert_eq!(
            intent_for_click(HitRegion::Backdrop),
            Some(ViewerIntent::Close)
        );
        assert_eq!(intent_for_click(HitRegion::Photo), None);
        assert_eq!(
            intent_for_click(HitRegion::ContinuousItem(3)),
            Some(ViewerIntent::Select(3))
        );
    }

    #[test]
    fn test_horizontal_swipe() {
        let mut drag = DragTracker::new(50.0, 80.0);
        drag.press(300.0, 200.0);
        assert_eq!(drag.release(200.0, 210.0, 3), Some(ViewerIntent::Navigate(1)));

        drag.press(100.0, 200.0);
        assert_eq!(drag.release(180.0, 190.0, 3), Some(ViewerIntent::Navigate(-1)));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_short_drag_is_ignored() {
        let mut drag = DragTracker::new(50.0, 80.0);
        drag.press(100.0, 100.0);
        assert_eq!(drag.release(130.0, 100.0, 3), None);
    }

    #[test]
    fn test_vertical_swipe_requires_multiple_items() {
        let mut drag = DragTracker::new(50.0, 80.0);
        drag.press(100.0, 400.0);
        assert_eq!(
            drag.release(105.0, 250.0, 2),
            Some(ViewerIntent::ToggleContinuous)
        );

        drag.press(100.0, 400.0);
        assert_eq!(drag.release(105.0, 250.0, 1), None);
    }

    #[test]
    fn test_release_without_press() {
        let mut drag = DragTracker::new(50.0, 80.0);
        drag.press(0.0, 0.0);
        drag.cancel();
        assert_eq!(drag.release(500.0, 0.0, 3), None);
    }
}
