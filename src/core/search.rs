//! Display names and name-based lookup for properties.
//!
//! A property is referred to as `"{title} - {postcode}"` (or just its title) and can
//! be looked up by a fragment of either its title or its postcode.

use crate::{
    entities::{Property, property, property::search_key},
    errors::{Error, Result},
};
use sea_orm::{
    Condition, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Default number of results returned by [`name_search`]
pub const DEFAULT_SEARCH_LIMIT: u64 = 100;

/// How a search fragment is matched against a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchOperator {
    /// Case-insensitive substring (`ilike`)
    #[default]
    ContainsIgnoreCase,
    /// Case-sensitive substring (`like`)
    Contains,
    /// Exact value (`=`)
    Equals,
    /// Exact value ignoring case (`=ilike`)
    EqualsIgnoreCase,
}

impl FromStr for SearchOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ilike" => Ok(Self::ContainsIgnoreCase),
            "like" => Ok(Self::Contains),
            "=" => Ok(Self::Equals),
            "=ilike" => Ok(Self::EqualsIgnoreCase),
            other => Err(Error::UnknownOperator {
                operator: other.to_string(),
            }),
        }
    }
}

impl SearchOperator {
    // `search_column` holds the case-folded copy of `column`
    fn matches(
        self,
        column: property::Column,
        search_column: property::Column,
        fragment: &str,
    ) -> SimpleExpr {
        match self {
            Self::ContainsIgnoreCase => Expr::col((Property, search_column))
                .like(LikeExpr::new(contains_pattern(&search_key(fragment))).escape('\\')),
            // LIKE folds ASCII case in SQLite, instr() does not
            Self::Contains => Expr::expr(
                Func::cust(Alias::new("instr"))
                    .arg(Expr::col((Property, column)))
                    .arg(fragment),
            )
            .gt(0),
            Self::Equals => Expr::col((Property, column)).eq(fragment),
            Self::EqualsIgnoreCase => Expr::col((Property, search_column)).eq(search_key(fragment)),
        }
    }
}

// Wraps the fragment in `%...%`, escaping LIKE wildcards so they match literally
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// A name-based property search.
///
/// Matches properties whose title OR postcode satisfies `operator` against
/// `fragment`, AND-ed with any extra `conditions`.
#[derive(Debug, Clone)]
pub struct NameSearch {
    /// Text matched against title and postcode; empty matches everything
    pub fragment: String,
    /// How `fragment` is compared
    pub operator: SearchOperator,
    /// Additional filters, combined with the name match
    pub conditions: Condition,
    /// Maximum number of results; `None` returns everything
    pub limit: Option<u64>,
    /// Also match archived properties
    pub include_archived: bool,
}

impl NameSearch {
    /// Case-insensitive substring search for `fragment`, limited to 100 active results.
    #[must_use]
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            operator: SearchOperator::default(),
            conditions: Condition::all(),
            limit: Some(DEFAULT_SEARCH_LIMIT),
            include_archived: false,
        }
    }

    /// Replaces the match operator.
    #[must_use]
    pub const fn operator(mut self, operator: SearchOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Adds a condition that every result must also satisfy.
    #[must_use]
    pub fn filter<F>(mut self, condition: F) -> Self
    where
        F: Into<sea_orm::sea_query::ConditionExpression>,
    {
        self.conditions = self.conditions.add(condition);
        self
    }

    /// Caps the number of results; `None` lifts the cap.
    #[must_use]
    pub const fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Lets archived properties match too.
    #[must_use]
    pub const fn include_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if !self.fragment.is_empty() {
            condition = condition.add(
                Condition::any()
                    .add(self.operator.matches(
                        property::Column::Title,
                        property::Column::TitleSearch,
                        &self.fragment,
                    ))
                    .add(self.operator.matches(
                        property::Column::Postcode,
                        property::Column::PostcodeSearch,
                        &self.fragment,
                    )),
            );
        }
        if !self.include_archived {
            condition = condition.add(property::Column::IsActive.eq(true));
        }
        condition.add(self.conditions.clone())
    }
}

/// Pairs each property's ID with its display name.
#[must_use]
pub fn display_names(properties: &[property::Model]) -> Vec<(i64, String)> {
    properties
        .iter()
        .map(|property| (property.id, property.display_name()))
        .collect()
}

/// Runs a name search, most recently created properties first.
///
/// An empty fragment applies only the extra conditions.
#[instrument(skip(db))]
pub async fn name_search(
    db: &DatabaseConnection,
    search: &NameSearch,
) -> Result<Vec<property::Model>> {
    let mut query = Property::find()
        .filter(search.condition())
        .order_by_desc(property::Column::Id);
    if let Some(limit) = search.limit {
        query = query.limit(limit);
    }

    let found = query.all(db).await?;
    debug!("Name search for '{}' matched {} properties", search.fragment, found.len());
    Ok(found)
}

/// Runs a name search and returns `(id, display name)` pairs.
pub async fn name_search_labels(
    db: &DatabaseConnection,
    search: &NameSearch,
) -> Result<Vec<(i64, String)>> {
    let found = name_search(db, search).await?;
    Ok(display_names(&found))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::property::{NewProperty, archive_property, create_property};
    use crate::test_utils::*;

    async fn create_with_postcode(
        db: &DatabaseConnection,
        title: &str,
        postcode: Option<&str>,
    ) -> Result<property::Model> {
        create_property(
            db,
            NewProperty {
                postcode: postcode.map(str::to_string),
                ..NewProperty::new(title, 150_000.0)
            },
        )
        .await
    }

    fn ids(properties: &[property::Model]) -> Vec<i64> {
        properties.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("abc"), "%abc%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!(
            "ilike".parse::<SearchOperator>().unwrap(),
            SearchOperator::ContainsIgnoreCase
        );
        assert_eq!("=".parse::<SearchOperator>().unwrap(), SearchOperator::Equals);
        assert!(matches!(
            "child_of".parse::<SearchOperator>(),
            Err(Error::UnknownOperator { .. })
        ));
    }

    #[tokio::test]
    async fn test_display_names() -> Result<()> {
        let db = setup_test_db().await?;
        let with = create_with_postcode(&db, "Canal House", Some("1011")).await?;
        let without = create_with_postcode(&db, "Dune Cabin", None).await?;

        assert_eq!(
            display_names(&[with.clone(), without.clone()]),
            vec![
                (with.id, "Canal House - 1011".to_string()),
                (without.id, "Dune Cabin".to_string()),
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_name_search_matches_title_or_postcode() -> Result<()> {
        let db = setup_test_db().await?;
        let by_title = create_with_postcode(&db, "Seaside Bungalow", Some("9000")).await?;
        let by_postcode = create_with_postcode(&db, "Town Flat", Some("SEA-12")).await?;
        let _neither = create_with_postcode(&db, "Mountain Chalet", Some("3920")).await?;
        let _no_postcode = create_with_postcode(&db, "Forest Lodge", None).await?;

        let found = name_search(&db, &NameSearch::new("sea")).await?;
        assert_eq!(ids(&found), vec![by_postcode.id, by_title.id]);

        let found = name_search(&db, &NameSearch::new("BUNGALOW")).await?;
        assert_eq!(ids(&found), vec![by_title.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_name_search_combines_extra_conditions() -> Result<()> {
        let db = setup_test_db().await?;
        let small = create_with_postcode(&db, "River Cottage", None).await?;
        let large = create_property(
            &db,
            NewProperty {
                bedrooms: Some(5),
                ..NewProperty::new("River Manor", 900_000.0)
            },
        )
        .await?;
        let _elsewhere = create_property(
            &db,
            NewProperty {
                bedrooms: Some(6),
                ..NewProperty::new("Hill Manor", 950_000.0)
            },
        )
        .await?;

        let search = NameSearch::new("river").filter(property::Column::Bedrooms.gte(3));
        assert_eq!(ids(&name_search(&db, &search).await?), vec![large.id]);

        let search = NameSearch::new("river");
        assert_eq!(
            ids(&name_search(&db, &search).await?),
            vec![large.id, small.id]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_name_search_empty_fragment_and_limit() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_with_postcode(&db, "A", None).await?;
        let b = create_with_postcode(&db, "B", None).await?;
        let c = create_with_postcode(&db, "C", None).await?;

        let all = name_search(&db, &NameSearch::new("")).await?;
        assert_eq!(ids(&all), vec![c.id, b.id, a.id]);

        let limited = name_search(&db, &NameSearch::new("").limit(Some(2))).await?;
        assert_eq!(ids(&limited), vec![c.id, b.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_name_search_skips_archived_by_default() -> Result<()> {
        let db = setup_test_db().await?;
        let archived = create_with_postcode(&db, "Old Mill", None).await?;
        archive_property(&db, archived.id).await?;

        assert!(name_search(&db, &NameSearch::new("mill")).await?.is_empty());

        let found = name_search(&db, &NameSearch::new("mill").include_archived()).await?;
        assert_eq!(ids(&found), vec![archived.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_name_search_operators() -> Result<()> {
        let db = setup_test_db().await?;
        let loft = create_with_postcode(&db, "Loft", Some("100%")).await?;
        let _lofty = create_with_postcode(&db, "Lofty Loft", Some("1000")).await?;

        let exact = NameSearch::new("Loft").operator(SearchOperator::Equals);
        assert_eq!(ids(&name_search(&db, &exact).await?), vec![loft.id]);

        let exact_any_case = NameSearch::new("LOFT").operator(SearchOperator::EqualsIgnoreCase);
        assert_eq!(ids(&name_search(&db, &exact_any_case).await?), vec![loft.id]);

        // '%' matches literally, not as a wildcard
        let literal = NameSearch::new("0%");
        assert_eq!(ids(&name_search(&db, &literal).await?), vec![loft.id]);

        let labels = name_search_labels(&db, &NameSearch::new("100%")).await?;
        assert_eq!(labels, vec![(loft.id, "Loft - 100%".to_string())]);

        Ok(())
    }

    #[tokio::test]
    async fn test_name_search_folds_accented_letters() -> Result<()> {
        let db = setup_test_db().await?;
        let chateau = create_with_postcode(&db, "CHÂTEAU Élysée", Some("F-75008")).await?;
        let _other = create_with_postcode(&db, "Chalet", None).await?;

        let found = name_search(&db, &NameSearch::new("château")).await?;
        assert_eq!(ids(&found), vec![chateau.id]);

        let found = name_search(&db, &NameSearch::new("ÉLYSÉE")).await?;
        assert_eq!(ids(&found), vec![chateau.id]);

        let found = name_search(&db, &NameSearch::new("f-75008")).await?;
        assert_eq!(ids(&found), vec![chateau.id]);

        let exact = NameSearch::new("château élysée").operator(SearchOperator::EqualsIgnoreCase);
        assert_eq!(ids(&name_search(&db, &exact).await?), vec![chateau.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_name_search_like_is_case_sensitive() -> Result<()> {
        let db = setup_test_db().await?;
        let villa = create_with_postcode(&db, "Villa Rosa", None).await?;

        let upper = NameSearch::new("VILLA").operator("like".parse()?);
        assert!(name_search(&db, &upper).await?.is_empty());

        let same_case = NameSearch::new("Villa").operator("like".parse()?);
        assert_eq!(ids(&name_search(&db, &same_case).await?), vec![villa.id]);

        let any_case = NameSearch::new("VILLA").operator("ilike".parse()?);
        assert_eq!(ids(&name_search(&db, &any_case).await?), vec![villa.id]);

        // No wildcard expansion either
        let wildcard = NameSearch::new("V_lla").operator(SearchOperator::Contains);
        assert!(name_search(&db, &wildcard).await?.is_empty());

        Ok(())
    }
}
