use std::time::Duration;

use eventdeck_api::{
    AuthTokenResponse, CreateEventRequest, EventRecord, LoginRequest, SignupRequest,
    UpdateEventRequest,
};

use crate::config::Config;

/// Commands that require async I/O (network calls).
pub enum AsyncCommand {
    FetchEvents,

    // ── Mutations ─────────────────────────────────────────────────────
    CreateEvent {
        req: CreateEventRequest,
    },
    UpdateEvent {
        event_id: String,
        req: UpdateEventRequest,
    },
    DeleteEvent {
        event_id: String,
    },
    AttendEvent {
        event_id: String,
    },

    // ── Auth ──────────────────────────────────────────────────────────
    Login {
        email: String,
        password: String,
    },
    Signup {
        username: String,
        email: String,
        password: String,
    },
}

/// Results returned by async commands.
pub enum CommandResult {
    Events(Result<Vec<EventRecord>, String>),

    Created(Result<EventRecord, String>),
    Updated(Result<EventRecord, String>),
    Deleted(Result<String, String>),  // Ok(event_id) or Err(msg)
    Attended(Result<String, String>), // Ok(event_id) or Err(msg)

    Auth(Result<AuthTokenResponse, String>),
}

fn make_client(config: &Config) -> Result<eventdeck_api_client::ApiClient, String> {
    let mut client =
        eventdeck_api_client::ApiClient::new(&config.server.url, Duration::from_secs(15))
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
    if config.session.is_signed_in() {
        client.set_auth(config.session.token.clone());
    }
    Ok(client)
}

pub async fn execute(cmd: AsyncCommand, config: &Config) -> CommandResult {
    match cmd {
        AsyncCommand::FetchEvents => {
            let result = async {
                let client = make_client(config)?;
                client.list_events().await.map_err(|e| format!("{e}"))
            }
            .await;
            CommandResult::Events(result)
        }

        // ── Mutations ─────────────────────────────────────────────────
        AsyncCommand::CreateEvent { req } => {
            let result = async {
                let client = make_client(config)?;
                client.create_event(&req).await.map_err(|e| format!("{e}"))
            }
            .await;
            CommandResult::Created(result)
        }

        AsyncCommand::UpdateEvent { event_id, req } => {
            let result = async {
                let client = make_client(config)?;
                client
                    .update_event(&event_id, &req)
                    .await
                    .map_err(|e| format!("{e}"))
            }
            .await;
            CommandResult::Updated(result)
        }

        AsyncCommand::DeleteEvent { event_id } => {
            let result = async {
                let client = make_client(config)?;
                client
                    .delete_event(&event_id)
                    .await
                    .map_err(|e| format!("{e}"))?;
                Ok(event_id)
            }
            .await;
            CommandResult::Deleted(result)
        }

        AsyncCommand::AttendEvent { event_id } => {
            let result = async {
                let client = make_client(config)?;
                client
                    .attend_event(&event_id)
                    .await
                    .map_err(|e| format!("{e}"))?;
                Ok(event_id)
            }
            .await;
            CommandResult::Attended(result)
        }

        // ── Auth ──────────────────────────────────────────────────────
        AsyncCommand::Login { email, password } => {
            let result = async {
                let client = make_client(config)?;
                client
                    .login(&LoginRequest { email, password })
                    .await
                    .map_err(|e| format!("{e}"))
            }
            .await;
            CommandResult::Auth(result)
        }

        AsyncCommand::Signup {
            username,
            email,
            password,
        } => {
            let result = async {
                let client = make_client(config)?;
                client
                    .signup(&SignupRequest {
                        username,
                        email,
                        password,
                    })
                    .await
                    .map_err(|e| format!("{e}"))
            }
            .await;
            CommandResult::Auth(result)
        }
    }
}
