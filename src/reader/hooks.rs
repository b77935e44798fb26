//! Pre-collation hooks supplied by the caller.

use crate::model::GraphRecord;

type Filter = Box<dyn Fn(&GraphRecord) -> bool>;
type Transform = Box<dyn Fn(GraphRecord) -> GraphRecord>;

/// Optional filter and transform applied to records before collation.
///
/// The filter runs first and drops records for which it returns `false`;
/// the transform then maps each surviving record.
#[derive(Default)]
pub struct ProcessHooks {
    pre_filter: Option<Filter>,
    pre_transform: Option<Transform>,
}

impl ProcessHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Fn(&GraphRecord) -> bool + 'static) -> Self {
        self.pre_filter = Some(Box::new(filter));
        self
    }

    pub fn with_transform(mut self, transform: impl Fn(GraphRecord) -> GraphRecord + 'static) -> Self {
        self.pre_transform = Some(Box::new(transform));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pre_filter.is_none() && self.pre_transform.is_none()
    }

    pub fn apply(&self, records: Vec<GraphRecord>) -> Vec<GraphRecord> {
        records
            .into_iter()
            .filter(|r| self.pre_filter.as_ref().is_none_or(|keep| keep(r)))
            .map(|r| match &self.pre_transform {
                Some(transform) => transform(r),
                None => r,
            })
            .collect()
    }
}

impl std::fmt::Debug for ProcessHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHooks")
            .field("pre_filter", &self.pre_filter.is_some())
            .field("pre_transform", &self.pre_transform.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;

    fn record(n: usize, label: usize) -> GraphRecord {
        GraphRecord::new(vec![vec![1.0]; n], Vec::new(), Label::Graph(label))
    }

    #[test]
    fn test_no_hooks_is_identity() {
        let records = vec![record(1, 0), record(2, 1)];
        assert_eq!(ProcessHooks::new().apply(records.clone()), records);
    }

    #[test]
    fn test_filter_then_transform() {
        let hooks = ProcessHooks::new()
            .with_filter(|r| r.label == Label::Graph(1))
            .with_transform(|mut r| {
                r.node_features.iter_mut().for_each(|row| row.push(0.0));
                r
            });

        let out = hooks.apply(vec![record(1, 0), record(2, 1), record(3, 1)]);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.num_node_features() == 2));
    }
}
