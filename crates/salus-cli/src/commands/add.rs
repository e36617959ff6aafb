use salus_core::forms::{CatalogBackend, MedicineForm};

use crate::error::CliError;

/// Submit one medicine through the add form and return the success message.
pub async fn add_medicine<B: CatalogBackend>(
    backend: &B,
    name_parts: &[String],
    company: &str,
    location: &str,
) -> Result<String, CliError> {
    let mut form = MedicineForm::new();
    form.set_name(name_parts.join(" "));
    form.select_company(company);
    form.select_location(location);

    let message = form.submit(backend).await;
    if message.is_success() {
        Ok(message.text)
    } else {
        Err(CliError::Rejected(message.text))
    }
}
