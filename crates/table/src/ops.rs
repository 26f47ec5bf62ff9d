//! Primitive table operations: outer merge with collision suffixing,
//! null-coalesce across collision pairs, projection, filtering, stable sort.
//!
//! Every operation takes its table by value and returns a new (or updated)
//! table; the report pipeline moves tables through these stages without
//! aliasing.

use std::collections::{HashMap, HashSet};

use crate::error::TableError;
use crate::table::Table;
use crate::value::Value;

// ---------------------------------------------------------------------------
// Collision pairs
// ---------------------------------------------------------------------------

/// A column name present in both merge sides, split into two physical
/// columns after the merge. Carrying the pair explicitly (instead of
/// re-concatenating the suffix at every use site) keeps user data containing
/// the suffix literal from being mistaken for a collision column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionPair {
    pub canonical: String,
    pub shadow: String,
}

pub fn collision_pairs(names: &[String], suffix: &str) -> Vec<CollisionPair> {
    names
        .iter()
        .map(|name| CollisionPair {
            canonical: name.clone(),
            shadow: format!("{name}{suffix}"),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Outer join of `left` and `right` on `join_key`.
///
/// Columns: all of `left`'s columns in their original order, then `right`'s
/// columns (minus the join key) in their original order, with names shared
/// by both sides renamed `name + suffix`. Rows: left rows first in original
/// order, right-side cells null where the key has no right match, then
/// right-only rows in original order with left-side cells null.
///
/// Sources are keyed by a natural identifier; if a source repeats a key, the
/// first occurrence wins as the join representative. Null keys match
/// nothing: a left row with a null key gets nulls on the right, a right row
/// with a null key is appended as right-only.
pub fn merge(
    left: Table,
    right: Table,
    join_key: &str,
    suffix: &str,
) -> Result<Table, TableError> {
    let left_key = left.column_index(join_key).ok_or(TableError::ColumnNotFound {
        column: join_key.to_string(),
    })?;
    let right_key = right.column_index(join_key).ok_or(TableError::ColumnNotFound {
        column: join_key.to_string(),
    })?;

    // Right columns carried into the result: (source index, output name)
    let mut right_cols: Vec<(usize, String)> = Vec::new();
    for (i, name) in right.columns.iter().enumerate() {
        if i == right_key {
            continue;
        }
        let out_name = if left.column_index(name).is_some() {
            format!("{name}{suffix}")
        } else {
            name.clone()
        };
        right_cols.push((i, out_name));
    }

    let mut columns = left.columns.clone();
    columns.extend(right_cols.iter().map(|(_, n)| n.clone()));
    let mut out = Table::new(columns);

    // First occurrence of each right key is the join representative.
    let mut right_index: HashMap<String, usize> = HashMap::new();
    for (ri, row) in right.rows.iter().enumerate() {
        if let Some(key) = row[right_key].key_repr() {
            right_index.entry(key).or_insert(ri);
        }
    }

    let mut matched_keys: HashSet<String> = HashSet::new();
    for lrow in &left.rows {
        let rmatch = lrow[left_key].key_repr().and_then(|key| {
            let hit = right_index.get(&key).copied();
            if hit.is_some() {
                matched_keys.insert(key);
            }
            hit
        });
        let mut row = lrow.clone();
        for (rcol, _) in &right_cols {
            row.push(match rmatch {
                Some(ri) => right.rows[ri][*rcol].clone(),
                None => Value::Null,
            });
        }
        out.rows.push(row);
    }

    for rrow in &right.rows {
        let unmatched = match rrow[right_key].key_repr() {
            Some(key) => !matched_keys.contains(&key),
            None => true,
        };
        if !unmatched {
            continue;
        }
        let mut row = vec![Value::Null; left.columns.len()];
        row[left_key] = rrow[right_key].clone();
        for (rcol, _) in &right_cols {
            row.push(rrow[*rcol].clone());
        }
        out.rows.push(row);
    }

    Ok(out)
}

/// Column names present in both tables, in the order they appear in `a`.
pub fn common_columns(a: &Table, b: &Table) -> Vec<String> {
    a.columns
        .iter()
        .filter(|name| b.column_index(name).is_some())
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Collision resolution
// ---------------------------------------------------------------------------

/// For each pair, nulls in the canonical column are filled from the shadow
/// column. Both-null stays null. Idempotent.
pub fn coalesce(mut table: Table, pairs: &[CollisionPair]) -> Result<Table, TableError> {
    for pair in pairs {
        let canonical = table
            .column_index(&pair.canonical)
            .ok_or(TableError::ColumnNotFound {
                column: pair.canonical.clone(),
            })?;
        let shadow = table
            .column_index(&pair.shadow)
            .ok_or(TableError::ColumnNotFound {
                column: pair.shadow.clone(),
            })?;
        for row in &mut table.rows {
            if row[canonical].is_null() && !row[shadow].is_null() {
                row[canonical] = row[shadow].clone();
            }
        }
    }
    Ok(table)
}

/// Removes each pair's shadow column after coalescing.
pub fn drop_collision_columns(
    mut table: Table,
    pairs: &[CollisionPair],
) -> Result<Table, TableError> {
    for pair in pairs {
        let shadow = table
            .column_index(&pair.shadow)
            .ok_or(TableError::ColumnNotFound {
                column: pair.shadow.clone(),
            })?;
        table.columns.remove(shadow);
        for row in &mut table.rows {
            row.remove(shadow);
        }
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Projection, filtering, sorting
// ---------------------------------------------------------------------------

/// Keeps the table's original column order restricted to `keep`. Names in
/// `keep` that the table does not have are ignored.
pub fn project(table: Table, keep: &[String]) -> Table {
    let kept: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, name)| keep.iter().any(|k| k == *name))
        .map(|(i, _)| i)
        .collect();

    let mut out = Table::new(kept.iter().map(|&i| table.columns[i].clone()).collect());
    for row in &table.rows {
        out.rows.push(kept.iter().map(|&i| row[i].clone()).collect());
    }
    out
}

/// Keeps rows whose value in `column` is non-null.
pub fn filter_non_null(mut table: Table, column: &str) -> Result<Table, TableError> {
    let col = table.column_index(column).ok_or(TableError::ColumnNotFound {
        column: column.to_string(),
    })?;
    table.rows.retain(|row| !row[col].is_null());
    Ok(table)
}

/// Stable sort by `column`. Nulls sort last in both directions; non-null
/// values follow the [`Value::sort_cmp`] total order, reversed when
/// `ascending` is false. Ties keep their pre-sort relative order.
pub fn sort_by(mut table: Table, column: &str, ascending: bool) -> Result<Table, TableError> {
    let col = table.column_index(column).ok_or(TableError::ColumnNotFound {
        column: column.to_string(),
    })?;
    table.rows.sort_by(|a, b| {
        let (va, vb) = (&a[col], &b[col]);
        match (va.is_null(), vb.is_null()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => {
                let ord = va.sort_cmp(vb);
                if ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
        }
    });
    Ok(table)
}
