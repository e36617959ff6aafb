use salus_core::forms::{AccountBackend, RegistrationForm, RegistrationOutcome};

use crate::error::CliError;

pub async fn run_register<B: AccountBackend>(
    backend: &B,
    form: &RegistrationForm,
    wait: bool,
) -> Result<(), CliError> {
    match form.submit(backend).await {
        RegistrationOutcome::Created {
            message, redirect, ..
        } => {
            println!("{}", message.text);
            if wait {
                tokio::time::sleep(redirect.after).await;
            }
            println!("Continue at {}", redirect.path);
            Ok(())
        }
        RegistrationOutcome::Rejected(message) => Err(CliError::Rejected(message.text)),
    }
}
