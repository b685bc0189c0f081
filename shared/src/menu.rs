//! Menu read model
//!
//! Turns the two independently fetched collections (sections and items) into
//! the grouping both the public menu and the admin dashboard render from.
//! Everything here is pure: the same input always yields the same output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{MenuItem, Section};

/// One section together with the items that belong to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionGroup {
    pub section: Section,
    pub items: Vec<MenuItem>,
    /// Section has no items yet ("Coming Soon")
    pub coming_soon: bool,
}

impl SectionGroup {
    fn new(section: Section) -> Self {
        Self {
            section,
            items: Vec::new(),
            coming_soon: true,
        }
    }

    fn push(&mut self, item: MenuItem) {
        self.items.push(item);
        self.coming_soon = false;
    }
}

/// Group `items` under `sections`.
///
/// - Groups follow section `created_at` ascending (ties by `id`), whatever the
///   input order is.
/// - Every section yields a group, empty ones included.
/// - Items keep their relative input order inside a group.
/// - Items whose `section_id` matches no section are dropped.
/// - A repeated section id keeps only its first occurrence.
pub fn group_by_section(sections: &[Section], items: &[MenuItem]) -> Vec<SectionGroup> {
    let mut ordered: Vec<&Section> = sections.iter().collect();
    ordered.sort_by_key(|s| (s.created_at, s.id));

    let mut groups: Vec<SectionGroup> = Vec::with_capacity(ordered.len());
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(ordered.len());
    for section in ordered {
        if index.contains_key(&section.id) {
            continue;
        }
        index.insert(section.id, groups.len());
        groups.push(SectionGroup::new(section.clone()));
    }

    for item in items {
        if let Some(&slot) = index.get(&item.section_id) {
            groups[slot].push(item.clone());
        }
    }

    groups
}

/// Count items that reference no known section
pub fn count_orphans(sections: &[Section], items: &[MenuItem]) -> usize {
    items
        .iter()
        .filter(|item| !sections.iter().any(|s| s.id == item.section_id))
        .count()
}

/// Grouped menu plus the currently active section.
///
/// Exactly one section is active whenever at least one exists; the first
/// group is the default. Selection lives only as long as the value does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuView {
    pub groups: Vec<SectionGroup>,
    #[serde(rename = "active_section_id")]
    active: Option<i64>,
    /// Items dropped because their section no longer exists
    pub orphan_count: usize,
}

impl MenuView {
    pub fn new(sections: &[Section], items: &[MenuItem]) -> Self {
        let groups = group_by_section(sections, items);
        let active = groups.first().map(|g| g.section.id);
        Self {
            groups,
            active,
            orphan_count: count_orphans(sections, items),
        }
    }

    /// Apply an optional selection, keeping the default when it is unknown
    pub fn with_selection(mut self, section_id: Option<i64>) -> Self {
        if let Some(id) = section_id {
            self.select(id);
        }
        self
    }

    pub fn active_section_id(&self) -> Option<i64> {
        self.active
    }

    pub fn active_group(&self) -> Option<&SectionGroup> {
        let id = self.active?;
        self.groups.iter().find(|g| g.section.id == id)
    }

    /// Switch the active section. Returns `false` (and changes nothing) when
    /// `section_id` is not part of this menu.
    pub fn select(&mut self, section_id: i64) -> bool {
        if self.groups.iter().any(|g| g.section.id == section_id) {
            self.active = Some(section_id);
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn section(id: i64, name: &str, created_at: i64) -> Section {
        Section {
            id,
            name: name.to_string(),
            created_at,
        }
    }

    fn item(id: i64, name: &str, section_id: i64, created_at: i64) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(150, 0),
            section_id,
            image_url: String::new(),
            created_at,
        }
    }

    fn names(group: &SectionGroup) -> Vec<&str> {
        group.items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn coffee_and_snacks_scenario() {
        let sections = vec![section(1, "Coffee", 100), section(2, "Snacks", 200)];
        let items = vec![item(10, "Latte", 1, 300)];

        let groups = group_by_section(&sections, &items);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].section.name, "Coffee");
        assert_eq!(names(&groups[0]), vec!["Latte"]);
        assert!(!groups[0].coming_soon);
        assert_eq!(groups[1].section.name, "Snacks");
        assert!(groups[1].items.is_empty());
        assert!(groups[1].coming_soon);
    }

    #[test]
    fn empty_inputs() {
        assert!(group_by_section(&[], &[]).is_empty());
        assert!(group_by_section(&[], &[item(1, "Lost", 9, 0)]).is_empty());

        let groups = group_by_section(&[section(1, "Coffee", 0)], &[]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].coming_soon);
    }

    #[test]
    fn orphans_are_dropped_without_error() {
        let sections = vec![section(1, "Coffee", 0)];
        let items = vec![
            item(10, "Latte", 1, 1),
            item(11, "Ghost", 99, 2),
            item(12, "Mocha", 1, 3),
        ];

        let groups = group_by_section(&sections, &items);
        assert_eq!(names(&groups[0]), vec!["Latte", "Mocha"]);
        assert_eq!(count_orphans(&sections, &items), 1);
    }

    #[test]
    fn one_group_per_section_and_union_is_all_non_orphans() {
        let sections = vec![
            section(1, "A", 10),
            section(2, "B", 20),
            section(3, "C", 30),
        ];
        let items = vec![
            item(1, "a1", 1, 1),
            item(2, "b1", 2, 2),
            item(3, "x", 7, 3),
            item(4, "a2", 1, 4),
            item(5, "c1", 3, 5),
        ];

        let groups = group_by_section(&sections, &items);
        assert_eq!(groups.len(), sections.len());
        for group in &groups {
            assert!(group.items.iter().all(|i| i.section_id == group.section.id));
        }

        let mut grouped: Vec<i64> = groups
            .iter()
            .flat_map(|g| g.items.iter().map(|i| i.id))
            .collect();
        grouped.sort();
        assert_eq!(grouped, vec![1, 2, 4, 5]);
    }

    #[test]
    fn section_order_follows_created_at_not_input_position() {
        let a = section(1, "Coffee", 100);
        let b = section(2, "Tea", 200);
        let c = section(3, "Snacks", 300);
        let permutations = [
            vec![a.clone(), b.clone(), c.clone()],
            vec![c.clone(), b.clone(), a.clone()],
            vec![b.clone(), a.clone(), c.clone()],
            vec![c.clone(), a.clone(), b.clone()],
        ];

        for sections in permutations {
            let order: Vec<i64> = group_by_section(&sections, &[])
                .iter()
                .map(|g| g.section.id)
                .collect();
            assert_eq!(order, vec![1, 2, 3]);
        }
    }

    #[test]
    fn equal_timestamps_fall_back_to_id() {
        let sections = vec![section(9, "Later id", 5), section(4, "Earlier id", 5)];
        let groups = group_by_section(&sections, &[]);
        assert_eq!(groups[0].section.id, 4);
        assert_eq!(groups[1].section.id, 9);
    }

    #[test]
    fn items_keep_input_order_within_section() {
        let sections = vec![section(1, "Coffee", 0)];
        let items = vec![
            item(3, "Espresso", 1, 30),
            item(1, "Latte", 1, 10),
            item(2, "Mocha", 1, 20),
        ];
        let groups = group_by_section(&sections, &items);
        assert_eq!(names(&groups[0]), vec!["Espresso", "Latte", "Mocha"]);
    }

    #[test]
    fn duplicate_section_ids_keep_first() {
        let sections = vec![section(1, "Coffee", 0), section(1, "Coffee again", 10)];
        let groups = group_by_section(&sections, &[item(1, "Latte", 1, 0)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].section.name, "Coffee");
        assert_eq!(groups[0].items.len(), 1);
    }

    #[test]
    fn grouping_is_idempotent() {
        let sections = vec![section(2, "Snacks", 20), section(1, "Coffee", 10)];
        let items = vec![item(10, "Latte", 1, 1), item(11, "Cookie", 2, 2)];

        let first = group_by_section(&sections, &items);
        let second = group_by_section(&sections, &items);
        assert_eq!(first, second);
        assert_eq!(MenuView::new(&sections, &items), MenuView::new(&sections, &items));
    }

    #[test]
    fn view_defaults_to_first_section() {
        let sections = vec![section(2, "Snacks", 20), section(1, "Coffee", 10)];
        let view = MenuView::new(&sections, &[]);
        assert_eq!(view.active_section_id(), Some(1));
        assert_eq!(view.active_group().unwrap().section.name, "Coffee");
    }

    #[test]
    fn view_without_sections_has_no_active_section() {
        let view = MenuView::new(&[], &[item(1, "Ghost", 3, 0)]);
        assert!(view.is_empty());
        assert_eq!(view.active_section_id(), None);
        assert!(view.active_group().is_none());
        assert_eq!(view.orphan_count, 1);
    }

    #[test]
    fn select_switches_only_to_known_sections() {
        let sections = vec![section(1, "Coffee", 10), section(2, "Snacks", 20)];
        let mut view = MenuView::new(&sections, &[]);

        assert!(view.select(2));
        assert_eq!(view.active_section_id(), Some(2));

        assert!(!view.select(42));
        assert_eq!(view.active_section_id(), Some(2));
    }

    #[test]
    fn with_selection_ignores_unknown_ids() {
        let sections = vec![section(1, "Coffee", 10), section(2, "Snacks", 20)];

        let view = MenuView::new(&sections, &[]).with_selection(Some(2));
        assert_eq!(view.active_section_id(), Some(2));

        let view = MenuView::new(&sections, &[]).with_selection(Some(77));
        assert_eq!(view.active_section_id(), Some(1));

        let view = MenuView::new(&sections, &[]).with_selection(None);
        assert_eq!(view.active_section_id(), Some(1));
    }

    #[test]
    fn view_serializes_active_section_id() {
        let view = MenuView::new(&[section(1, "Coffee", 0)], &[]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["active_section_id"], 1);
        assert_eq!(json["groups"][0]["coming_soon"], true);
        assert_eq!(json["orphan_count"], 0);
    }
}
