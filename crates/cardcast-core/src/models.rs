//! Domain models for Cardcast

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use chrono::NaiveDate;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Spending categories shared by every component
///
/// The set is fixed: monthly rows and card rate tables carry exactly one
/// value per variant, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Category {
    Groceries,
    Dining,
    Travel,
    Gas,
    Online,
    Bills,
    Entertainment,
    Others,
}

impl Category {
    /// Number of categories in the set
    pub const COUNT: usize = 8;

    /// All categories, in canonical order
    pub const ALL: [Category; Category::COUNT] = [
        Self::Groceries,
        Self::Dining,
        Self::Travel,
        Self::Gas,
        Self::Online,
        Self::Bills,
        Self::Entertainment,
        Self::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "groceries",
            Self::Dining => "dining",
            Self::Travel => "travel",
            Self::Gas => "gas",
            Self::Online => "online",
            Self::Bills => "bills",
            Self::Entertainment => "entertainment",
            Self::Others => "others",
        }
    }

    /// Position of this category in [`Category::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "groceries" | "grocery" => Ok(Self::Groceries),
            "dining" => Ok(Self::Dining),
            "travel" => Ok(Self::Travel),
            "gas" => Ok(Self::Gas),
            "online" => Ok(Self::Online),
            "bills" => Ok(Self::Bills),
            "entertainment" => Ok(Self::Entertainment),
            "others" | "other" => Ok(Self::Others),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One value per category
///
/// Backed by a fixed array indexed by [`Category::index`], so a table can
/// never be missing a category or carry an extra one. Serializes as a map
/// keyed by category label.
#[derive(Debug, Clone, PartialEq)]
pub struct PerCategory<T> {
    values: [T; Category::COUNT],
}

impl<T> PerCategory<T> {
    /// Build a table by computing each category's value
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            values: std::array::from_fn(|i| f(Category::ALL[i])),
        }
    }

    /// Build a table from a fallible per-category function, stopping at the
    /// first error
    pub fn try_from_fn<E>(
        mut f: impl FnMut(Category) -> std::result::Result<T, E>,
    ) -> std::result::Result<Self, E> {
        let mut slots: [Option<T>; Category::COUNT] = std::array::from_fn(|_| None);
        for category in Category::ALL {
            slots[category.index()] = Some(f(category)?);
        }
        Ok(Self {
            values: slots.map(|slot| slot.expect("every category slot is filled")),
        })
    }

    /// Iterate `(category, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().zip(self.values.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    /// Transform every value, keeping the category association
    pub fn map<U>(&self, mut f: impl FnMut(Category, &T) -> U) -> PerCategory<U> {
        PerCategory::from_fn(|category| f(category, &self.values[category.index()]))
    }
}

impl PerCategory<f64> {
    /// Sum across all categories
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl<T: Default> Default for PerCategory<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Category> for PerCategory<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        &self.values[category.index()]
    }
}

impl<T> IndexMut<Category> for PerCategory<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        &mut self.values[category.index()]
    }
}

impl<T: Serialize> Serialize for PerCategory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::COUNT))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PerCategory<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PerCategoryVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for PerCategoryVisitor<T> {
            type Value = PerCategory<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with exactly one entry per spending category")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut slots: [Option<T>; Category::COUNT] = std::array::from_fn(|_| None);

                while let Some(key) = access.next_key::<String>()? {
                    let category: Category = key.parse().map_err(de::Error::custom)?;
                    if slots[category.index()].is_some() {
                        return Err(de::Error::custom(format!(
                            "duplicate category: {}",
                            category
                        )));
                    }
                    slots[category.index()] = Some(access.next_value()?);
                }

                PerCategory::try_from_fn(|category| {
                    slots[category.index()]
                        .take()
                        .ok_or_else(|| de::Error::custom(format!("missing category: {}", category)))
                })
            }
        }

        deserializer.deserialize_map(PerCategoryVisitor(PhantomData))
    }
}

/// A single spending record
///
/// Immutable once constructed; [`Transaction::new`] rejects amounts that are
/// not positive and finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord")]
pub struct Transaction {
    date: NaiveDate,
    category: Category,
    amount: f64,
}

impl Transaction {
    pub fn new(date: NaiveDate, category: Category, amount: f64) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "transaction amount must be positive, got {} on {}",
                amount, date
            )));
        }
        Ok(Self {
            date,
            category,
            amount,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// Unvalidated transaction shape used for deserialization
#[derive(Debug, Clone, Deserialize)]
struct TransactionRecord {
    date: NaiveDate,
    category: Category,
    amount: f64,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = Error;

    fn try_from(record: TransactionRecord) -> Result<Self> {
        Transaction::new(record.date, record.category, record.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_labels() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert_eq!(" Dining ".parse::<Category>().unwrap(), Category::Dining);
        assert_eq!("other".parse::<Category>().unwrap(), Category::Others);
    }

    #[test]
    fn test_unknown_category() {
        let err = "crypto".parse::<Category>().unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(ref s) if s == "crypto"));
    }

    #[test]
    fn test_category_index_matches_all() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_per_category_index_and_total() {
        let mut table: PerCategory<f64> = PerCategory::default();
        table[Category::Dining] = 12.5;
        table[Category::Travel] = 7.5;

        assert_eq!(table[Category::Dining], 12.5);
        assert_eq!(table[Category::Groceries], 0.0);
        assert_eq!(table.total(), 20.0);
    }

    #[test]
    fn test_per_category_serializes_as_map() {
        let table = PerCategory::from_fn(|c| c.index() as u32);
        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json["groceries"], 0);
        assert_eq!(json["others"], 7);
        assert_eq!(json.as_object().unwrap().len(), Category::COUNT);
    }

    #[test]
    fn test_per_category_deserialize_requires_every_category() {
        let json = r#"{"groceries":1,"dining":2,"travel":3,"gas":4,"online":5,"bills":6,"entertainment":7}"#;
        let err = serde_json::from_str::<PerCategory<u32>>(json).unwrap_err();
        assert!(err.to_string().contains("missing category: others"));

        let full = r#"{"groceries":1,"dining":2,"travel":3,"gas":4,"online":5,"bills":6,"entertainment":7,"others":8}"#;
        let table: PerCategory<u32> = serde_json::from_str(full).unwrap();
        assert_eq!(table[Category::Others], 8);
    }

    #[test]
    fn test_per_category_deserialize_rejects_unknown_label() {
        let json = r#"{"groceries":1,"pets":2}"#;
        let err = serde_json::from_str::<PerCategory<u32>>(json).unwrap_err();
        assert!(err.to_string().contains("Unknown category: pets"));
    }

    #[test]
    fn test_transaction_rejects_non_positive_amount() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(Transaction::new(date, Category::Gas, 0.0).is_err());
        assert!(Transaction::new(date, Category::Gas, -4.0).is_err());
        assert!(Transaction::new(date, Category::Gas, f64::NAN).is_err());

        let tx = Transaction::new(date, Category::Gas, 42.0).unwrap();
        assert_eq!(tx.amount(), 42.0);
        assert_eq!(tx.category(), Category::Gas);
        assert_eq!(tx.date(), date);
    }

    #[test]
    fn test_transaction_deserialize_validates() {
        let ok: Transaction =
            serde_json::from_str(r#"{"date":"2025-01-04","category":"dining","amount":18.5}"#)
                .unwrap();
        assert_eq!(ok.category(), Category::Dining);

        let bad = serde_json::from_str::<Transaction>(
            r#"{"date":"2025-01-04","category":"dining","amount":-1}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_category_deserialize_matches_from_str() {
        let parsed: Vec<Category> =
            serde_json::from_str(r#"["Dining", " Grocery ", "OTHER", "travel"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Category::Dining,
                Category::Groceries,
                Category::Others,
                Category::Travel
            ]
        );

        let tx: Transaction =
            serde_json::from_str(r#"{"date":"2025-01-04","category":"Gas","amount":30.0}"#)
                .unwrap();
        assert_eq!(tx.category(), Category::Gas);

        let err = serde_json::from_str::<Category>(r#""pets""#).unwrap_err();
        assert!(err.to_string().contains("Unknown category: pets"));

        // Serialization stays canonical lowercase
        assert_eq!(serde_json::to_string(&Category::Groceries).unwrap(), r#""groceries""#);
    }
}
