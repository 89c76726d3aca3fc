use std::sync::OnceLock;

use minijinja::{AutoEscape, Environment, context};

use crate::entities::catalog::{CatalogEntry, Quote};
use crate::entities::history::SearchHistory;
use crate::entities::medicine::MedicineInfo;
use crate::error::MedLookupError;
use crate::transform::medicine::NOT_FOUND;

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn env() -> Result<&'static Environment<'static>, MedLookupError> {
    if let Some(env) = ENV.get() {
        return Ok(env);
    }

    let mut env = Environment::new();
    env.set_auto_escape_callback(|name| {
        if name.ends_with(".html.j2") {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });
    env.add_template("base.html.j2", include_str!("../../templates/base.html.j2"))?;
    env.add_template(
        "medicine_card.html.j2",
        include_str!("../../templates/medicine_card.html.j2"),
    )?;
    env.add_template("index.html.j2", include_str!("../../templates/index.html.j2"))?;
    env.add_template(
        "result.html.j2",
        include_str!("../../templates/result.html.j2"),
    )?;
    env.add_template(
        "catalog.html.j2",
        include_str!("../../templates/catalog.html.j2"),
    )?;
    env.add_template("quotes.html.j2", include_str!("../../templates/quotes.html.j2"))?;
    env.add_template("error.html.j2", include_str!("../../templates/error.html.j2"))?;

    let _ = ENV.set(env);
    Ok(ENV
        .get()
        .expect("ENV should be initialized by the time this is reached"))
}

/// Search form, optional lookup result, and the session's recent searches.
pub fn index_page(
    query: Option<&str>,
    info: Option<&MedicineInfo>,
    history: &SearchHistory,
) -> Result<String, MedLookupError> {
    let tmpl = env()?.get_template("index.html.j2")?;
    Ok(tmpl.render(context! {
        query => query,
        info => info,
        not_found => NOT_FOUND,
        history => history.entries(),
    })?)
}

/// Standalone result page for one lookup.
pub fn result_page(
    query: &str,
    info: &MedicineInfo,
    history: &SearchHistory,
) -> Result<String, MedLookupError> {
    let tmpl = env()?.get_template("result.html.j2")?;
    Ok(tmpl.render(context! {
        query => query,
        info => info,
        not_found => NOT_FOUND,
        history => history.entries(),
    })?)
}

pub fn catalog_page(entries: &[&CatalogEntry], filter: &str) -> Result<String, MedLookupError> {
    let tmpl = env()?.get_template("catalog.html.j2")?;
    Ok(tmpl.render(context! {
        entries => entries,
        filter => filter,
    })?)
}

pub fn quotes_page(quotes: &[Quote]) -> Result<String, MedLookupError> {
    let tmpl = env()?.get_template("quotes.html.j2")?;
    Ok(tmpl.render(context! { quotes => quotes })?)
}

pub fn error_page(status: u16, title: &str) -> Result<String, MedLookupError> {
    let tmpl = env()?.get_template("error.html.j2")?;
    Ok(tmpl.render(context! { status => status, title => title })?)
}
