use salus_core::forms::{CatalogBackend, MedicineForm};

use crate::error::CliError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CatalogList {
    Companies,
    Locations,
}

/// Known names of one list, narrowed the way the add form's autocomplete does.
pub async fn catalog_names<B: CatalogBackend>(
    backend: &B,
    list: CatalogList,
    filter: Option<&str>,
) -> Vec<String> {
    let mut form = MedicineForm::new();
    form.load_catalog(backend).await;

    let filter = filter.unwrap_or_default();
    let names = match list {
        CatalogList::Companies => {
            form.company_input(filter);
            form.filtered_companies()
        }
        CatalogList::Locations => {
            form.location_input(filter);
            form.filtered_locations()
        }
    };
    names.into_iter().map(str::to_string).collect()
}

pub async fn run_catalog<B: CatalogBackend>(
    backend: &B,
    list: CatalogList,
    filter: Option<&str>,
    as_json: bool,
) -> Result<(), CliError> {
    let names = catalog_names(backend, list, filter).await;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}
