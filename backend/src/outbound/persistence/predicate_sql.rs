//! Translates domain [`Predicate`] trees into boxed Diesel conditions.
//!
//! The in-memory adapter evaluates the same trees with
//! [`Predicate::matches`]; both must agree on every row, including the
//! case-insensitive substring semantics of `ContainsAny`.

use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;

use crate::domain::query::{DocumentField, Literal, Predicate, UserField};

use super::schema::{documents, users};

/// A boolean condition usable in `filter` for table `T`.
pub(crate) type BoxedCondition<T> = Box<dyn BoxableExpression<T, Pg, SqlType = Bool>>;

fn always<T>() -> BoxedCondition<T> {
    Box::new(sql::<Bool>("TRUE"))
}

fn never<T>() -> BoxedCondition<T> {
    Box::new(sql::<Bool>("FALSE"))
}

/// Escape `LIKE` metacharacters and wrap the term for a substring match.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Generates a translator from a field enum to conditions on one table.
///
/// `int` and `text` list the columns by type; a literal of the other type
/// compares as `FALSE`, matching the in-memory evaluation.
macro_rules! predicate_translator {
    (
        $(#[$meta:meta])*
        fn $name:ident($field:ty) -> $table:path {
            int { $($int_variant:ident => $int_column:path),* $(,)? }
            text { $($text_variant:ident => $text_column:path),* $(,)? }
        }
    ) => {
        $(#[$meta])*
        pub(crate) fn $name(predicate: &Predicate<$field>) -> BoxedCondition<$table> {
            type Field = $field;
            match predicate {
                Predicate::True => always(),
                Predicate::False => never(),
                Predicate::Eq(field, literal) => match (field, literal) {
                    $((Field::$int_variant, Literal::Int(value)) => {
                        Box::new($int_column.eq(*value))
                    })*
                    $((Field::$text_variant, Literal::Text(value)) => {
                        Box::new($text_column.eq(value.clone()))
                    })*
                    _ => never(),
                },
                Predicate::ContainsAny(field, terms) => terms
                    .iter()
                    .map(|term| -> BoxedCondition<$table> {
                        let pattern = contains_pattern(term);
                        match field {
                            $(Field::$text_variant => Box::new($text_column.ilike(pattern)),)*
                            _ => never(),
                        }
                    })
                    .reduce(|left, right| -> BoxedCondition<$table> {
                        Box::new(left.or(right))
                    })
                    .unwrap_or_else(never),
                Predicate::And(children) => children
                    .iter()
                    .map($name)
                    .reduce(|left, right| -> BoxedCondition<$table> {
                        Box::new(left.and(right))
                    })
                    .unwrap_or_else(always),
                Predicate::Or(children) => children
                    .iter()
                    .map($name)
                    .reduce(|left, right| -> BoxedCondition<$table> {
                        Box::new(left.or(right))
                    })
                    .unwrap_or_else(never),
            }
        }
    };
}

predicate_translator! {
    /// Condition on the `documents` table.
    fn document_condition(DocumentField) -> documents::table {
        int {
            OwnerId => documents::owner_id,
            OwnerRoleId => documents::owner_role_id,
        }
        text {
            Access => documents::access,
            Title => documents::title,
            Content => documents::content,
        }
    }
}

predicate_translator! {
    /// Condition on the `users` table.
    fn user_condition(UserField) -> users::table {
        int {
            Id => users::id,
            RoleId => users::role_id,
        }
        text {
            Username => users::username,
            Firstname => users::firstname,
            Lastname => users::lastname,
            Email => users::email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::QueryPredicateBuilder;
    use crate::domain::{RequesterContext, RoleId, UserId};
    use diesel::debug_query;
    use rstest::rstest;

    fn render_documents(predicate: &Predicate<DocumentField>) -> String {
        let query = documents::table
            .filter(document_condition(predicate))
            .select(documents::id);
        debug_query::<Pg, _>(&query).to_string()
    }

    fn render_users(predicate: &Predicate<UserField>) -> String {
        let query = users::table
            .filter(user_condition(predicate))
            .select(users::id);
        debug_query::<Pg, _>(&query).to_string()
    }

    #[rstest]
    #[case("tia", "%tia%")]
    #[case("snake_case", "%snake\\_case%")]
    #[case("100%", "%100\\%%")]
    #[case("a\\b", "%a\\\\b%")]
    fn patterns_escape_like_metacharacters(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }

    #[rstest]
    fn constants_render_as_sql_literals() {
        assert!(render_documents(&Predicate::True).contains("WHERE TRUE"));
        assert!(render_documents(&Predicate::False).contains("WHERE FALSE"));
        assert!(render_documents(&Predicate::And(Vec::new())).contains("WHERE TRUE"));
        assert!(render_documents(&Predicate::Or(Vec::new())).contains("WHERE FALSE"));
    }

    #[rstest]
    fn mismatched_literals_never_match() {
        let predicate = Predicate::eq_text(DocumentField::OwnerId, "5");
        assert!(render_documents(&predicate).contains("WHERE FALSE"));
    }

    #[rstest]
    fn access_predicate_renders_every_clause() {
        let requester = RequesterContext::new(
            UserId::new(9).expect("valid id"),
            RoleId::new(3).expect("valid id"),
        );
        let predicate = QueryPredicateBuilder::default().document_access_predicate(&requester);
        let rendered = render_documents(&predicate);

        assert!(rendered.contains(r#""documents"."access" = $1"#), "{rendered}");
        assert!(rendered.contains(r#""documents"."owner_id" = $2"#), "{rendered}");
        assert!(rendered.contains(r#""documents"."owner_role_id" = $4"#), "{rendered}");
        assert!(rendered.contains(" OR "), "{rendered}");
        assert!(rendered.contains(" AND "), "{rendered}");
        assert!(rendered.contains(r#"["public", 9, "role", 3]"#), "{rendered}");
    }

    #[rstest]
    fn search_terms_become_case_insensitive_matches() {
        let predicate = Predicate::ContainsAny(
            UserField::Email,
            vec!["ada".to_owned(), "grace".to_owned()],
        );
        let rendered = render_users(&predicate);

        assert!(rendered.contains(r#""users"."email" ILIKE $1"#), "{rendered}");
        assert!(rendered.contains(r#""users"."email" ILIKE $2"#), "{rendered}");
        assert!(rendered.contains(r#"["%ada%", "%grace%"]"#), "{rendered}");
    }

    #[rstest]
    fn containment_on_integer_columns_is_false() {
        let predicate = Predicate::ContainsAny(UserField::RoleId, vec!["1".to_owned()]);
        assert!(render_users(&predicate).contains("WHERE FALSE"));
    }
}
