//! Local UI toggles. Plain booleans, reset on every page load.

/// Services shown before "See All Services" is pressed.
pub const COLLAPSED_SERVICES: usize = 6;

/// The services grid's "show more" state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServicesToggle {
    expanded: bool,
}

impl ServicesToggle {
    pub fn collapsed() -> Self {
        Self { expanded: false }
    }

    pub fn expanded() -> Self {
        Self { expanded: true }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Entries shown in the grid.
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.expanded {
            items
        } else {
            &items[..items.len().min(COLLAPSED_SERVICES)]
        }
    }

    /// Entries kept back until the grid is expanded.
    pub fn hidden<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.visible(items).len()..]
    }

    /// Whether the toggle button is needed at all.
    pub fn needs_toggle(total: usize) -> bool {
        total > COLLAPSED_SERVICES
    }

    /// Button label for the current state.
    pub fn label(&self) -> &'static str {
        if self.expanded {
            "Show Less"
        } else {
            "See All Services"
        }
    }
}

/// The mobile navigation menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuToggle {
    open: bool,
}

impl MenuToggle {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Following a menu link closes the menu.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Accessible label for the menu button.
    pub fn label(&self) -> &'static str {
        if self.open {
            "Close menu"
        } else {
            "Open menu"
        }
    }
}
