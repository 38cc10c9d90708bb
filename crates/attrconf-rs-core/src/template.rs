//! Template trees describing the expected config shape.

use crate::{Check, Key};

/// Expected structure of one config level, in declaration order.
///
/// Keys are compared by their string form; declaring a name again replaces
/// the earlier entry and keeps its position.
#[derive(Debug, Clone, Default)]
pub struct Template {
    entries: Vec<(Key, TemplateNode)>,
}

/// Entry of a [`Template`].
#[derive(Debug, Clone)]
pub enum TemplateNode {
    /// Leaf evaluated with the check evaluator.
    Check(Check),
    /// Nested section; the config value must itself be a mapping.
    Section(Template),
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf check.
    pub fn field(mut self, key: impl Into<Key>, check: impl Into<Check>) -> Self {
        self.insert(key.into(), TemplateNode::Check(check.into()));
        self
    }

    /// Add a nested section.
    pub fn section(mut self, key: impl Into<Key>, template: Template) -> Self {
        self.insert(key.into(), TemplateNode::Section(template));
        self
    }

    fn insert(&mut self, key: Key, node: TemplateNode) {
        let name = key.as_name();
        match self.entries.iter_mut().find(|(existing, _)| existing.as_name() == name) {
            Some(entry) => entry.1 = node,
            None => self.entries.push((key, node)),
        }
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &TemplateNode)> {
        self.entries.iter().map(|(key, node)| (key, node))
    }

    /// Entry declared for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&TemplateNode> {
        self.entries
            .iter()
            .find(|(key, _)| key.as_name() == name)
            .map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Template> for TemplateNode {
    fn from(template: Template) -> Self {
        TemplateNode::Section(template)
    }
}

impl From<Check> for TemplateNode {
    fn from(check: Check) -> Self {
        TemplateNode::Check(check)
    }
}

#[cfg(test)]
mod tests {
    use super::{Template, TemplateNode};
    use crate::{Check, ValueKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn repeated_names_replace_in_place() {
        let template = Template::new()
            .field(1, ValueKind::String)
            .field("x", ValueKind::Integer)
            .section("1", Template::new())
            .field("x", Check::equals(3));

        assert_eq!(template.len(), 2);
        let names: Vec<_> = template.iter().map(|(key, _)| key.as_name()).collect();
        assert_eq!(names, vec!["1", "x"]);
        assert!(matches!(template.get("1"), Some(TemplateNode::Section(_))));
        assert!(matches!(
            template.get("x"),
            Some(TemplateNode::Check(Check::Equals(_)))
        ));
    }
}
