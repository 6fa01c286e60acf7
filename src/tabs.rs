use anyhow::{Result, anyhow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Controls,
    Conversation,
    Help,
}

impl Tab {
    pub fn all() -> [Tab; 3] {
        [Tab::Controls, Tab::Conversation, Tab::Help]
    }

    /// Identifier of the content pane this tab shows
    pub fn target(&self) -> &'static str {
        match self {
            Tab::Controls => "controls",
            Tab::Conversation => "conversation",
            Tab::Help => "help",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Controls => "Controls",
            Tab::Conversation => "Conversation",
            Tab::Help => "Help",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Controls => 0,
            Tab::Conversation => 1,
            Tab::Help => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::all().get(i).copied()
    }

    pub fn from_target(target: &str) -> Option<Self> {
        Self::all().into_iter().find(|t| t.target() == target)
    }
}

/// Holds the single active tab; its pane is the one rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabBar {
    active: Tab,
}

impl TabBar {
    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }

    pub fn activate(&mut self, tab: Tab) {
        self.active = tab;
    }

    /// Activate by pane identifier. Unknown identifiers leave the selection alone.
    pub fn activate_target(&mut self, target: &str) -> Result<Tab> {
        let tab = Tab::from_target(target)
            .ok_or_else(|| anyhow!("No content pane matches tab target '{}'", target))?;
        self.activate(tab);
        Ok(tab)
    }

    pub fn next(&mut self) {
        let i = (self.active.index() + 1) % Tab::all().len();
        self.active = Tab::all()[i];
    }

    pub fn prev(&mut self) {
        let len = Tab::all().len();
        let i = (self.active.index() + len - 1) % len;
        self.active = Tab::all()[i];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_count(bar: &TabBar) -> usize {
        Tab::all().iter().filter(|t| bar.is_active(**t)).count()
    }

    #[test]
    fn test_exactly_one_active_after_any_clicks() {
        let mut bar = TabBar::default();
        assert_eq!(active_count(&bar), 1);

        let clicks = [Tab::Help, Tab::Conversation, Tab::Conversation, Tab::Controls, Tab::Help];
        for tab in clicks {
            bar.activate(tab);
            assert_eq!(active_count(&bar), 1);
            assert!(bar.is_active(tab));
        }
    }

    #[test]
    fn test_reactivating_is_idempotent() {
        let mut bar = TabBar::default();
        bar.activate(Tab::Conversation);
        bar.activate(Tab::Conversation);
        assert_eq!(bar.active(), Tab::Conversation);
        assert_eq!(active_count(&bar), 1);
    }

    #[test]
    fn test_activate_target() {
        let mut bar = TabBar::default();
        assert_eq!(bar.activate_target("help").unwrap(), Tab::Help);
        assert_eq!(bar.active(), Tab::Help);
    }

    #[test]
    fn test_unknown_target_does_not_change_selection() {
        let mut bar = TabBar::default();
        bar.activate(Tab::Conversation);
        assert!(bar.activate_target("settings").is_err());
        assert_eq!(bar.active(), Tab::Conversation);
        assert_eq!(active_count(&bar), 1);
    }

    #[test]
    fn test_cycling_wraps() {
        let mut bar = TabBar::default();
        bar.prev();
        assert_eq!(bar.active(), Tab::Help);
        bar.next();
        assert_eq!(bar.active(), Tab::Controls);
        bar.next();
        assert_eq!(bar.active(), Tab::Conversation);
    }
}
