use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub root_keys: usize,
    pub arrays: usize,
    pub objects: usize,
    /// Deepest collection nesting; the root collection sits at depth 0.
    pub max_depth: usize,
}

impl CatalogStats {
    pub fn collections(&self) -> usize {
        self.arrays + self.objects
    }

    fn merge(self, other: Self) -> Self {
        Self {
            root_keys: self.root_keys,
            arrays: self.arrays + other.arrays,
            objects: self.objects + other.objects,
            max_depth: self.max_depth.max(other.max_depth),
        }
    }
}

pub fn compute(document: &Value) -> CatalogStats {
    let root_keys = match document {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => 0,
    };

    CatalogStats {
        root_keys,
        ..fold(document, 0)
    }
}

fn fold(value: &Value, depth: usize) -> CatalogStats {
    let own = CatalogStats {
        root_keys: 0,
        arrays: usize::from(value.is_array()),
        objects: usize::from(value.is_object()),
        max_depth: depth,
    };

    let children: Box<dyn Iterator<Item = &Value> + '_> = match value {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(map) => Box::new(map.values()),
        _ => return CatalogStats::default(),
    };

    children
        .filter(|child| child.is_array() || child.is_object())
        .map(|child| fold(child, depth + 1))
        .fold(own, CatalogStats::merge)
}
