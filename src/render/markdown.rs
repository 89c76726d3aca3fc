use std::sync::OnceLock;

use minijinja::{Environment, context};

use crate::entities::medicine::MedicineInfo;
use crate::error::MedLookupError;
use crate::transform::medicine::NOT_FOUND;

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn env() -> Result<&'static Environment<'static>, MedLookupError> {
    if let Some(env) = ENV.get() {
        return Ok(env);
    }

    let mut env = Environment::new();
    env.add_template(
        "medicine.md.j2",
        include_str!("../../templates/medicine.md.j2"),
    )?;

    let _ = ENV.set(env);
    Ok(ENV
        .get()
        .expect("ENV should be initialized by the time this is reached"))
}

pub fn medicine_markdown(
    name: &str,
    status: &str,
    info: &MedicineInfo,
) -> Result<String, MedLookupError> {
    let tmpl = env()?.get_template("medicine.md.j2")?;
    let body = tmpl.render(context! {
        name => name.trim(),
        status => status,
        not_found => NOT_FOUND,
        purpose => &info.purpose,
        dosage => &info.dosage,
        side_effects => &info.side_effects,
        precautions => &info.precautions,
        image => &info.image,
    })?;
    Ok(body)
}
