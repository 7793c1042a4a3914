use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use qualaboa::config::{AppConfig, ClientMode};
use qualaboa::dashboard::{
    AuthGateway, DashboardView, LoginView, MockAuth, Redirect, RemoteAuth, RestaurantForm,
    ViewState,
};
use qualaboa::models::{is_valid_uf, is_valid_venue_type, Restaurant, UF_CODES, VENUE_TYPES};
use qualaboa::session::{FileSession, SessionStore};
use qualaboa::store::{HttpStore, MemoryStore, RestaurantStore};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "console",
        client_mode = ?config.client_mode,
        api_base_url = %config.api_base_url,
        "loaded console configuration"
    );

    let latency = Duration::from_millis(config.mock_latency_ms);
    // The token file persists across runs in both modes, the way the browser
    // client keeps its token in local storage.
    let session: Arc<dyn SessionStore> = Arc::new(FileSession::new(&config.session_file));
    let (store, gateway): (Arc<dyn RestaurantStore>, Arc<dyn AuthGateway>) =
        match config.client_mode {
            ClientMode::Demo => (
                Arc::new(MemoryStore::demo(latency)),
                Arc::new(MockAuth::new(latency)),
            ),
            ClientMode::Remote => {
                let client = reqwest::Client::new();
                (
                    Arc::new(HttpStore::new(
                        client.clone(),
                        config.api_base_url.clone(),
                        session.clone(),
                    )),
                    Arc::new(RemoteAuth::new(client, config.api_base_url.clone())),
                )
            }
        };

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if session.token().is_none() && !login_screen(&mut input, &gateway, &session).await? {
            break;
        }
        if !dashboard_screen(&mut input, &store, &session).await? {
            break;
        }
        // logout dropped us back to the login screen
    }

    Ok(())
}

async fn login_screen(
    input: &mut Input,
    gateway: &Arc<dyn AuthGateway>,
    session: &Arc<dyn SessionStore>,
) -> Result<bool> {
    let mut login = LoginView::new(gateway.clone(), session.clone());

    println!();
    println!("=== Login ===");
    loop {
        let Some(email) = prompt(input, "E-mail (ou \"quit\"): ").await? else {
            return Ok(false);
        };
        let email = email.trim();
        if email == "quit" || email == "exit" {
            return Ok(false);
        }
        let Some(password) = prompt(input, "Senha: ").await? else {
            return Ok(false);
        };

        if login.submit(email, password.trim()).await == Some(Redirect::Dashboard) {
            return Ok(true);
        }
        if let Some(message) = login.error() {
            println!("{message}");
        }
    }
}

/// Returns true on logout (back to the login screen), false to quit.
async fn dashboard_screen(
    input: &mut Input,
    store: &Arc<dyn RestaurantStore>,
    session: &Arc<dyn SessionStore>,
) -> Result<bool> {
    let mut view = DashboardView::new(store.clone(), session.clone());

    println!();
    println!("=== Estabelecimentos ===");
    if view.mount().await == Some(Redirect::Login) {
        return Ok(true);
    }
    if view.state() == ViewState::Loading {
        println!("Não foi possível carregar a lista. Use \"reload\" para tentar de novo.");
    } else {
        render_list(view.restaurants());
    }

    loop {
        let Some(line) = prompt(input, "> ").await? else {
            return Ok(false);
        };
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("list"), _) => render_list(view.restaurants()),
            (Some("add"), _) => {
                if view.state() != ViewState::Idle {
                    println!("Lista ainda não carregada.");
                    continue;
                }
                if fill_form(input, view.form_mut(), false).await? {
                    view.submit().await;
                    if *view.form() == RestaurantForm::default() {
                        println!("Estabelecimento cadastrado.");
                    } else {
                        println!("Falha ao salvar; os dados foram mantidos no formulário.");
                    }
                    render_list(view.restaurants());
                } else {
                    view.cancel_edit();
                    println!("Cadastro cancelado.");
                }
            }
            (Some("edit"), Some(raw_id)) => {
                let Ok(id) = raw_id.parse::<i64>() else {
                    println!("Id inválido: {raw_id}");
                    continue;
                };
                if view.state() != ViewState::Idle {
                    println!("Lista ainda não carregada.");
                    continue;
                }
                if !view.begin_edit(id) {
                    println!("Nenhum estabelecimento com id {id}.");
                    continue;
                }
                println!("CNPJ: {} (não editável)", view.form().cnpj);
                if fill_form(input, view.form_mut(), true).await? {
                    view.submit().await;
                    if view.editing_id().is_none() {
                        println!("Estabelecimento atualizado.");
                    } else {
                        println!("Falha ao salvar; os dados foram mantidos no formulário.");
                    }
                    render_list(view.restaurants());
                } else {
                    view.cancel_edit();
                    println!("Edição cancelada.");
                }
            }
            (Some("delete"), Some(raw_id)) => {
                let Ok(id) = raw_id.parse::<i64>() else {
                    println!("Id inválido: {raw_id}");
                    continue;
                };
                view.delete(id).await;
                render_list(view.restaurants());
            }
            (Some("reload"), _) => {
                // A reload while the first fetch never finished repeats the
                // mount, the same way a browser refresh would.
                if view.state() == ViewState::Idle {
                    view.refresh().await;
                } else if view.mount().await == Some(Redirect::Login) {
                    return Ok(true);
                }
                if view.state() == ViewState::Loading {
                    println!("Não foi possível carregar a lista.");
                } else {
                    render_list(view.restaurants());
                }
            }
            (Some("logout"), _) => {
                view.logout();
                return Ok(true);
            }
            (Some("quit"), _) | (Some("exit"), _) => return Ok(false),
            (Some(_), _) => {
                println!("Comandos: list | add | edit <id> | delete <id> | reload | logout | quit");
            }
            (None, _) => {}
        }
    }
}

/// When `keep_current` is set an empty answer keeps the value already in
/// the form and the cnpj is skipped.
async fn fill_form(
    input: &mut Input,
    form: &mut RestaurantForm,
    keep_current: bool,
) -> Result<bool> {
    let Some(name) = field(input, "Nome", &form.name, keep_current).await? else {
        return Ok(false);
    };
    form.name = name;

    if !keep_current {
        let Some(cnpj) = field(input, "CNPJ", &form.cnpj, false).await? else {
            return Ok(false);
        };
        form.cnpj = cnpj;
    }

    let Some(state) = field(input, "Estado (UF)", &form.state, keep_current).await? else {
        return Ok(false);
    };
    let state = state.to_uppercase();
    if !is_valid_uf(&state) {
        println!("UF desconhecida: {state}. Opções: {}", UF_CODES.join(", "));
        return Ok(false);
    }
    form.state = state;

    let Some(city) = field(input, "Cidade", &form.city, keep_current).await? else {
        return Ok(false);
    };
    form.city = city;

    let Some(kind) = field(input, "Tipo", &form.kind, keep_current).await? else {
        return Ok(false);
    };
    let kind = kind.to_lowercase();
    if !is_valid_venue_type(&kind) {
        println!("Tipo desconhecido: {kind}. Opções: {}", VENUE_TYPES.join(", "));
        return Ok(false);
    }
    form.kind = kind;

    let Some(hours) = field(
        input,
        "Horário de funcionamento",
        &form.operating_hours,
        keep_current,
    )
    .await?
    else {
        return Ok(false);
    };
    form.operating_hours = hours;

    let Some(postal_code) = field(input, "CEP", &form.postal_code, keep_current).await? else {
        return Ok(false);
    };
    form.postal_code = postal_code;

    let Some(street_number) = field(input, "Número", &form.street_number, keep_current).await?
    else {
        return Ok(false);
    };
    form.street_number = street_number;

    let Some(endereco) = field(input, "Endereço", &form.endereco, keep_current).await? else {
        return Ok(false);
    };
    form.endereco = endereco;

    Ok(true)
}

async fn field(
    input: &mut Input,
    label: &str,
    current: &str,
    keep_current: bool,
) -> Result<Option<String>> {
    let text = if keep_current {
        format!("{label} [{current}]: ")
    } else {
        format!("{label}: ")
    };
    let Some(answer) = prompt(input, &text).await? else {
        return Ok(None);
    };
    let answer = answer.trim();
    if answer.is_empty() && keep_current {
        Ok(Some(current.to_string()))
    } else {
        Ok(Some(answer.to_string()))
    }
}

async fn prompt(input: &mut Input, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}

fn render_list(restaurants: &[Restaurant]) {
    if restaurants.is_empty() {
        println!("Nenhum estabelecimento cadastrado.");
        return;
    }
    for restaurant in restaurants {
        println!(
            "#{} {} | {} | {}/{} | {} | {}",
            restaurant.id,
            restaurant.name,
            restaurant.cnpj,
            restaurant.city,
            restaurant.state,
            restaurant.kind,
            restaurant.operating_hours
        );
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
