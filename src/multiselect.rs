/// Multi-select input: zero or more values out of a fixed candidate list.
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiSelect {
    candidates: Vec<String>,
    selected: BTreeSet<String>,
    placeholder: String,
    expanded: bool,
    cursor: usize,
}

impl MultiSelect {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            candidates: Vec::new(),
            selected: BTreeSet::new(),
            placeholder: placeholder.into(),
            expanded: false,
            cursor: 0,
        }
    }

    pub fn with_candidates(placeholder: impl Into<String>, candidates: &[String]) -> Self {
        let mut control = Self::new(placeholder);
        control.set_candidates(candidates);
        control
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Replace the offered values. Duplicates are collapsed and selected
    /// values no longer offered are dropped.
    pub fn set_candidates(&mut self, candidates: &[String]) {
        let mut seen = BTreeSet::new();
        self.candidates = candidates
            .iter()
            .filter(|candidate| seen.insert(candidate.as_str()))
            .cloned()
            .collect();
        let offered = self.candidates.iter().collect::<BTreeSet<_>>();
        self.selected.retain(|value| offered.contains(value));
        if self.cursor >= self.candidates.len() {
            self.cursor = self.candidates.len().saturating_sub(1);
        }
    }

    /// Replace the selection. Values that are not candidates are ignored.
    pub fn set_selection<S: AsRef<str>>(&mut self, values: &[S]) {
        self.selected = values
            .iter()
            .map(AsRef::as_ref)
            .filter(|value| self.candidates.iter().any(|candidate| candidate == value))
            .map(str::to_string)
            .collect();
    }

    /// The selection, in candidate order.
    pub fn selection(&self) -> Vec<String> {
        self.candidates
            .iter()
            .filter(|candidate| self.selected.contains(*candidate))
            .cloned()
            .collect()
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.contains(value)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn expand(&mut self) {
        self.expanded = true;
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    pub fn focus_lost(&mut self) {
        self.collapse();
    }

    /// Closes the list after picking.
    pub fn done(&mut self) {
        self.collapse();
    }

    pub fn toggle(&mut self, value: &str) {
        if !self.candidates.iter().any(|candidate| candidate == value) {
            return;
        }
        if !self.selected.remove(value) {
            self.selected.insert(value.to_string());
        }
    }

    pub fn toggle_cursor(&mut self) {
        if let Some(value) = self.candidates.get(self.cursor).cloned() {
            self.toggle(&value);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.candidates.iter().cloned().collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_up(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        if self.cursor == 0 {
            self.cursor = self.candidates.len() - 1;
        } else {
            self.cursor -= 1;
        }
    }

    pub fn cursor_down(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.candidates.len();
    }

    /// Collapsed text: placeholder, the single value, or a count.
    pub fn summary(&self) -> String {
        let selection = self.selection();
        match selection.len() {
            0 => self.placeholder.clone(),
            1 => selection[0].clone(),
            count => format!("{count} items selected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn summary_follows_selection_size() {
        let mut control = MultiSelect::with_candidates("Select staff...", &names(&["A", "B", "C"]));
        assert_eq!(control.summary(), "Select staff...");
        control.toggle("B");
        assert_eq!(control.summary(), "B");
        control.toggle("C");
        assert_eq!(control.summary(), "2 items selected");
        control.toggle("B");
        control.toggle("C");
        assert_eq!(control.summary(), "Select staff...");
    }

    #[test]
    fn cursor_wraps_around() {
        let mut control = MultiSelect::with_candidates("", &names(&["A", "B"]));
        control.cursor_up();
        assert_eq!(control.cursor(), 1);
        control.cursor_down();
        assert_eq!(control.cursor(), 0);
        control.toggle_cursor();
        assert_eq!(control.selection(), names(&["A"]));
    }
}
