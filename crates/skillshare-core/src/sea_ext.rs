use sea_orm::sea_query::{Expr, IntoColumnRef, SimpleExpr, extension::postgres::PgExpr};

/// Escape `%`, `_` and `\` so user input matches literally inside a LIKE pattern.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match: `col ILIKE '%term%'`.
pub fn contains_ci<C: IntoColumnRef>(col: C, term: &str) -> SimpleExpr {
    Expr::col(col).ilike(format!("%{}%", escape_like(term)))
}
