use std::fmt;
use std::ops::{Index, IndexMut};

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::Topic;

/// One of the four fixed grade buckets of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Notebook,
    Practices,
    Exam,
    Others,
}

/// Static per-category behavior. Indexed by `Category::slot`.
pub struct CategoryInfo {
    /// Wire tag used by the backend (`"Notebook"`, `"Practices"`, ...).
    pub tag: &'static str,
    /// Column/button label shown by the grading view.
    pub label: &'static str,
    /// Reads the matching weight field of a topic.
    pub weight: fn(&Topic) -> f64,
}

fn notebook_weight(topic: &Topic) -> f64 {
    topic.notebook_weight
}

fn practice_weight(topic: &Topic) -> f64 {
    topic.practice_weight
}

fn exam_weight(topic: &Topic) -> f64 {
    topic.exam_weight
}

fn other_weight(topic: &Topic) -> f64 {
    topic.other_weight
}

static CATEGORY_TABLE: [CategoryInfo; 4] = [
    CategoryInfo {
        tag: "Notebook",
        label: "Notebook",
        weight: notebook_weight,
    },
    CategoryInfo {
        tag: "Practices",
        label: "Practices",
        weight: practice_weight,
    },
    CategoryInfo {
        tag: "Exam",
        label: "Exam",
        weight: exam_weight,
    },
    CategoryInfo {
        tag: "Others",
        label: "Others",
        weight: other_weight,
    },
];

impl Category {
    /// Fixed aggregation order.
    pub const ALL: [Category; 4] = [
        Category::Notebook,
        Category::Practices,
        Category::Exam,
        Category::Others,
    ];

    fn slot(self) -> usize {
        match self {
            Category::Notebook => 0,
            Category::Practices => 1,
            Category::Exam => 2,
            Category::Others => 3,
        }
    }

    pub fn info(self) -> &'static CategoryInfo {
        &CATEGORY_TABLE[self.slot()]
    }

    pub fn tag(self) -> &'static str {
        self.info().tag
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Resolve a backend tag. Only used where raw payloads enter the crate.
    pub fn from_tag(tag: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.tag() == tag)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Category::from_tag(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "unknown category '{}', expected one of Notebook, Practices, Exam, Others",
                raw
            ))
        })
    }
}

/// A value for each category, always in `Category::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerCategory<T>([T; 4]);

impl<T> PerCategory<T> {
    pub fn from_fn(f: impl FnMut(Category) -> T) -> Self {
        PerCategory(Category::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T> Index<Category> for PerCategory<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        &self.0[category.slot()]
    }
}

impl<T> IndexMut<Category> for PerCategory<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        &mut self.0[category.slot()]
    }
}

impl<T: Serialize> Serialize for PerCategory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.tag(), value)?;
        }
        map.end()
    }
}
