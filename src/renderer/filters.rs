//! Filters available inside every template, e.g. `{{ name | pascal_case }}`.

use cruet::{
    case::{
        camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
        screaming_snake::to_screaming_snake_case, snake::to_snake_case,
        table::to_table_case, train::to_train_case,
    },
    string::{pluralize::to_plural, singularize::to_singular},
    suffix::foreign_key::to_foreign_key,
};
use log::warn;
use minijinja::Environment;
use regex::Regex;

/// Registers the case conversion, inflection and matching filters.
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("camel_case", to_camel_case);
    env.add_filter("kebab_case", to_kebab_case);
    env.add_filter("pascal_case", to_pascal_case);
    env.add_filter("screaming_snake_case", to_screaming_snake_case);
    env.add_filter("snake_case", to_snake_case);
    env.add_filter("table_case", to_table_case);
    env.add_filter("train_case", to_train_case);
    env.add_filter("plural", to_plural);
    env.add_filter("singular", to_singular);
    env.add_filter("foreign_key", to_foreign_key);
    env.add_filter("regex", regex_filter);
    env.add_filter("swap_ext", swap_ext);
}

/// Tests if a string matches a regular expression; invalid patterns never match.
pub fn regex_filter(val: &str, re: &str) -> bool {
    match Regex::new(re) {
        Ok(re) => re.is_match(val),
        Err(err) => {
            warn!("Invalid regex '{re}': {err}");
            false
        }
    }
}

/// Replaces the extension of a file name: `{{ 'view.j2' | swap_ext('swift') }}`.
pub fn swap_ext(val: &str, ext: &str) -> String {
    let stem = match val.rfind('.') {
        Some(index) if index > 0 => &val[..index],
        _ => val,
    };
    if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{}", ext.trim_start_matches('.'))
    }
}
