//! Find/replace toolbar wiring for an editor pane.
//!
//! The bar is created lazily on first show and torn down on hide; the
//! toolbar button reflects the latched state. The editor container decides
//! how the bar is actually laid out.

/// Host of the find/replace bar.
pub trait FindReplaceContainer {
    fn insert_bar(&mut self, with_replace: bool);
    fn remove_bar(&mut self);
    fn focus_editor(&mut self);
    /// Focus the find field, optionally selecting its contents.
    fn focus_find_field(&mut self, select_all: bool);
}

pub struct FindReplace {
    with_replace: bool,
    shown: bool,
}

impl FindReplace {
    pub fn new() -> Self {
        Self::with_mode(true)
    }

    /// `with_replace = false` gives a find-only bar.
    pub fn with_mode(with_replace: bool) -> Self {
        Self {
            with_replace,
            shown: false,
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Label for the toolbar button's tooltip.
    pub fn button_title(&self) -> &'static str {
        if self.with_replace {
            "Find/Replace"
        } else {
            "Find"
        }
    }

    /// Whether the toolbar button should render in its latched state.
    pub fn button_latched(&self) -> bool {
        self.shown
    }

    pub fn toggle(&mut self, container: &mut dyn FindReplaceContainer) {
        if self.shown {
            self.hide(container);
        } else {
            self.show(container);
        }
    }

    /// Shows the bar if needed and always focuses the find field, so a
    /// repeated show gesture re-focuses instead of flickering the bar.
    pub fn show(&mut self, container: &mut dyn FindReplaceContainer) {
        if !self.shown {
            container.insert_bar(self.with_replace);
            self.shown = true;
        }
        container.focus_find_field(true);
    }

    pub fn hide(&mut self, container: &mut dyn FindReplaceContainer) {
        if self.shown {
            container.remove_bar();
            self.shown = false;
        }
        container.focus_editor();
    }
}

impl Default for FindReplace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingContainer {
        inserts: Vec<bool>,
        removes: usize,
        editor_focuses: usize,
        find_focuses: usize,
    }

    impl FindReplaceContainer for RecordingContainer {
        fn insert_bar(&mut self, with_replace: bool) {
            self.inserts.push(with_replace);
        }
        fn remove_bar(&mut self) {
            self.removes += 1;
        }
        fn focus_editor(&mut self) {
            self.editor_focuses += 1;
        }
        fn focus_find_field(&mut self, _select_all: bool) {
            self.find_focuses += 1;
        }
    }

    #[test]
    fn bar_is_created_lazily_and_only_once() {
        let mut c = RecordingContainer::default();
        let mut fr = FindReplace::new();

        fr.show(&mut c);
        fr.show(&mut c);

        assert_eq!(c.inserts, vec![true]);
        assert_eq!(c.find_focuses, 2);
        assert!(fr.button_latched());
    }

    #[test]
    fn hide_removes_bar_and_refocuses_editor() {
        let mut c = RecordingContainer::default();
        let mut fr = FindReplace::new();

        fr.show(&mut c);
        fr.hide(&mut c);

        assert_eq!(c.removes, 1);
        assert_eq!(c.editor_focuses, 1);
        assert!(!fr.button_latched());

        // hiding again only refocuses the editor
        fr.hide(&mut c);
        assert_eq!(c.removes, 1);
        assert_eq!(c.editor_focuses, 2);
    }

    #[test]
    fn toggle_alternates() {
        let mut c = RecordingContainer::default();
        let mut fr = FindReplace::with_mode(false);
        assert_eq!(fr.button_title(), "Find");

        fr.toggle(&mut c);
        assert!(fr.is_shown());
        assert_eq!(c.inserts, vec![false]);

        fr.toggle(&mut c);
        assert!(!fr.is_shown());
    }
}
