//! End-to-end tests: configuration, shipped data files, agents and
//! executors wired together against mock models.
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use helpdesk_a2a::{spawn_execution, Event, Message, Part, RequestContext, TaskState};
use helpdesk_agents::{AgentKind, DomainAgent, DomainExecutor};
use helpdesk_config::Config;
use helpdesk_model::ScriptedMockProvider;
use helpdesk_tools::{search_faqs, search_orders, search_products, RequestIdLog};

fn shipped(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn shipped_config() -> Config {
    let mut cfg = Config::default();
    cfg.data.faqs = shipped("faqs.txt");
    cfg.data.orders = shipped("orders.csv");
    cfg.data.products = shipped("products.csv");
    cfg
}

#[test]
fn shipped_orders_resolve_by_id() {
    let log = RequestIdLog::new();
    let r = search_orders(&shipped("orders.csv"), Some("1002"), &log);
    assert_eq!(r.orders_list.len(), 1);
    assert_eq!(r.orders_list[0]["status"], "enviado");
    assert_eq!(r.message, "Encontramos la orden con ID '1002' en nuestro sistema.");

    let all = search_orders(&shipped("orders.csv"), None, &log);
    assert_eq!(all.orders_list.len(), 5);
}

#[test]
fn shipped_products_match_on_description() {
    let log = RequestIdLog::new();
    let r = search_products(&shipped("products.csv"), Some("CAFÉ"), &log);
    assert_eq!(r.products_list.len(), 1);
    assert_eq!(r.products_list[0]["name"], "Molinillo");
    assert_eq!(r.message, "Encontramos 1 productos que coinciden con 'CAFÉ': Molinillo");
}

#[test]
fn shipped_faqs_are_returned_whole() {
    let log = RequestIdLog::new();
    let r = search_faqs(&shipped("faqs.txt"), "devoluciones", &log);
    let on_disk = std::fs::read_to_string(shipped("faqs.txt")).unwrap();
    assert_eq!(r.faqs_content, on_disk);
    assert_eq!(r.query, "devoluciones");
}

#[test]
fn every_issued_request_id_is_logged() {
    let log = RequestIdLog::new();
    let mut ids = Vec::new();
    for _ in 0..20 {
        ids.push(search_orders(&shipped("orders.csv"), Some("1001"), &log).request_id);
        ids.push(search_products(&shipped("products.csv"), None, &log).request_id);
    }
    assert!(!log.is_empty());
    for id in &ids {
        assert!(log.contains(id));
        let n: u32 = id.strip_prefix("request_id_").unwrap().parse().unwrap();
        assert!((1_000_000..=9_999_999).contains(&n));
    }
}

#[tokio::test]
async fn config_file_selects_mock_model_and_data_paths() {
    let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        f,
        "[model]\nprovider = \"mock\"\n\n[data]\norders = \"{}\"\n",
        shipped("orders.csv").display().to_string().replace('\\', "\\\\")
    )
    .unwrap();
    let cfg = helpdesk_config::load(Some(f.path())).unwrap();
    assert_eq!(cfg.model.provider, "mock");
    assert_eq!(cfg.data.orders_path(), shipped("orders.csv"));

    let agent = DomainAgent::from_config(AgentKind::Orders, &cfg).unwrap();
    let exec = Arc::new(DomainExecutor::new(agent));
    let ctx = RequestContext::new(Message::user_text("hola"), None);
    let (_, task) = spawn_execution(exec, ctx).collect().await.unwrap();
    let task = task.unwrap();
    assert_eq!(task.status.state, TaskState::Completed);
    assert_eq!(task.artifact("form").unwrap().parts, vec![Part::text("MOCK: hola")]);
}

#[tokio::test]
async fn product_lookup_end_to_end() {
    let mut cfg = shipped_config();
    cfg.agent.skip_summarization = true;
    let model = Arc::new(ScriptedMockProvider::tool_only("c1", "search_products", r#"{"product_name":"cerámica"}"#));
    let agent = DomainAgent::new(AgentKind::Products, model, &cfg, Arc::new(RequestIdLog::new()));
    let exec = Arc::new(DomainExecutor::new(agent));

    let mut msg = Message::user_text("¿tienen tazas de cerámica?");
    msg.context_id = Some("sesion-7".into());
    let (events, task) = spawn_execution(exec, RequestContext::new(msg, None)).collect().await.unwrap();

    let artifact_at = events.iter().position(|e| matches!(e, Event::ArtifactUpdate(_))).unwrap();
    let final_at = events.iter().position(Event::is_final).unwrap();
    assert!(artifact_at < final_at);
    assert_eq!(final_at, events.len() - 1);

    let task = task.unwrap();
    assert_eq!(task.context_id, "sesion-7");
    assert_eq!(task.status.state, TaskState::Completed);
    let data = match &task.artifact("products").unwrap().parts[0] {
        Part::Data { data } => data.clone(),
        other => panic!("expected data part, got {other:?}"),
    };
    assert_eq!(data["products"][0]["name"], "Tazas");
    assert_eq!(data["products"][0]["price"], 18.5);
}

#[tokio::test]
async fn conversation_continues_in_the_same_session() {
    let cfg = shipped_config();
    let model = Arc::new(ScriptedMockProvider::new(vec![
        vec![helpdesk_model::ResponseEvent::TextDelta("Primera respuesta".into()), helpdesk_model::ResponseEvent::Done],
        vec![helpdesk_model::ResponseEvent::TextDelta("Segunda respuesta".into()), helpdesk_model::ResponseEvent::Done],
    ]));
    let agent = DomainAgent::new(AgentKind::Faqs, model.clone(), &cfg, Arc::new(RequestIdLog::new()));
    let exec = Arc::new(DomainExecutor::new(agent));

    for text in ["¿envío gratis?", "¿y a Canarias?"] {
        let mut msg = Message::user_text(text);
        msg.context_id = Some("conv-1".into());
        let (_, task) = spawn_execution(exec.clone(), RequestContext::new(msg, None)).collect().await.unwrap();
        assert_eq!(task.unwrap().status.state, TaskState::Completed);
    }

    let reqs = model.requests.lock().unwrap();
    assert_eq!(reqs.len(), 2);
    let second: Vec<_> = reqs[1].messages.iter().filter_map(|m| m.as_text()).collect();
    assert!(second.contains(&"¿envío gratis?"));
    assert!(second.contains(&"Primera respuesta"));
    assert!(second.contains(&"¿y a Canarias?"));
}

#[test]
fn cards_are_distinct_per_agent() {
    let names: Vec<String> = AgentKind::ALL.iter().map(|k| k.card(None).name).collect();
    assert_eq!(names, vec!["faqs_management_agent", "order_management_agent", "product_catalog_agent"]);
    let urls: std::collections::HashSet<String> = AgentKind::ALL.iter().map(|k| k.card(None).url).collect();
    assert_eq!(urls.len(), 3);
}
