// tests/db.rs
//
// Rodam contra um Postgres de verdade (DATABASE_URL) com as migrations do projeto:
//   cargo test --test db -- --ignored

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use pingdesk_crm::{
    config::{AppState, Config},
    db::ProposalRepository,
    models::{
        access::AccessScope,
        auth::{CreateUserPayload, User, UserRole},
        lead::CreateLeadPayload,
        meeting::{MeetingKind, ScheduleMeetingPayload},
        proposal::{NewProposal, ProposalDescription, ProposalStatus},
    },
};

fn state(pool: PgPool) -> AppState {
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://nao-usado".to_string()),
        "JWT_SECRET" => Some("segredo-de-teste".to_string()),
        _ => None,
    })
    .unwrap();
    AppState::with_pool(pool, &config)
}

async fn user(state: &AppState, email: &str, role: UserRole) -> User {
    state
        .user_service
        .create_user(CreateUserPayload {
            name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            password: "senha-forte".to_string(),
            role,
        })
        .await
        .unwrap()
}

fn proposal(provider: &str) -> NewProposal {
    NewProposal {
        provider: provider.to_string(),
        description: Some("Primeiro contato".to_string()),
        ..Default::default()
    }
}

fn lead(provider: &str) -> CreateLeadPayload {
    CreateLeadPayload {
        provider: provider.to_string(),
        contact: Some("contato@provedor.com.br".to_string()),
        website: None,
        state: Some("SP".to_string()),
    }
}

fn meeting(provider: &str, date: NaiveDate) -> ScheduleMeetingPayload {
    ScheduleMeetingPayload {
        proposal_id: None,
        provider: Some(provider.to_string()),
        date,
        time: "10:00".to_string(),
        kind: MeetingKind::Call,
        contact: "Carlos".to_string(),
        notes: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn seller_lists_never_contain_other_sellers_records(pool: PgPool) {
    let app = state(pool);
    let ana = user(&app, "ana@pingdesk.com.br", UserRole::Seller).await;
    let bruno = user(&app, "bruno@pingdesk.com.br", UserRole::Seller).await;
    let admin = user(&app, "admin@pingdesk.com.br", UserRole::Admin).await;

    let day = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
    for (seller, provider) in [(&ana, "Fibra Norte"), (&bruno, "Conecta Sul")] {
        let scope = AccessScope::for_user(seller);
        app.proposal_service.create_proposal(scope, proposal(provider)).await.unwrap();
        app.lead_service.create_lead(scope, lead(provider)).await.unwrap();
        app.meeting_service.schedule_meeting(scope, meeting(provider, day)).await.unwrap();
    }

    for seller in [&ana, &bruno] {
        let scope = AccessScope::for_user(seller);

        let proposals = app.proposal_service.list_proposals(scope).await.unwrap();
        assert_eq!(proposals.len(), 1);
        assert!(proposals.iter().all(|p| p.seller_id == seller.id));
        assert_eq!(proposals[0].descriptions().len(), 1);

        let leads = app.lead_service.list_leads(scope).await.unwrap();
        assert_eq!(leads.len(), 1);
        assert!(leads.iter().all(|l| l.seller_id == seller.id));

        let meetings = app.meeting_service.list_meetings(scope, Some(day)).await.unwrap();
        assert_eq!(meetings.len(), 1);
        assert!(meetings.iter().all(|m| m.seller_id == seller.id));
    }

    let everything = AccessScope::for_user(&admin);
    assert_eq!(app.proposal_service.list_proposals(everything).await.unwrap().len(), 2);
    assert_eq!(app.lead_service.list_leads(everything).await.unwrap().len(), 2);
    assert_eq!(app.meeting_service.list_meetings(everything, Some(day)).await.unwrap().len(), 2);
    assert!(app.meeting_service.list_meetings(everything, day.succ_opt()).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn closing_fields_are_enforced_by_the_table(pool: PgPool) {
    let app = state(pool.clone());
    let ana = user(&app, "ana@pingdesk.com.br", UserRole::Seller).await;
    let created = app
        .proposal_service
        .create_proposal(AccessScope::for_user(&ana), proposal("Fibra Norte"))
        .await
        .unwrap();

    // Concluída sem plano e valor
    let result = sqlx::query("UPDATE proposals SET status = $2 WHERE id = $1")
        .bind(created.id)
        .bind(ProposalStatus::Won)
        .execute(&pool)
        .await;
    assert!(result.is_err());

    // Plano e valor fora de uma proposta concluída
    let result = sqlx::query("UPDATE proposals SET plan = 'Fibra 500', value = 199.90 WHERE id = $1")
        .bind(created.id)
        .execute(&pool)
        .await;
    assert!(result.is_err());

    let stored = app
        .proposal_service
        .get_proposal(AccessScope::for_user(&ana), created.id)
        .await
        .unwrap();
    assert_eq!(stored.status(), ProposalStatus::Started);
    assert_eq!(stored.plan(), None);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn descriptions_at_the_same_instant_keep_insertion_order(pool: PgPool) {
    let app = state(pool.clone());
    let ana = user(&app, "ana@pingdesk.com.br", UserRole::Seller).await;
    let created = app
        .proposal_service
        .create_proposal(AccessScope::for_user(&ana), NewProposal {
            provider: "Fibra Norte".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let repo = ProposalRepository::new(pool.clone());
    let instant = Utc::now();
    for text in ["primeira", "segunda", "terceira"] {
        let entry = ProposalDescription {
            id: Uuid::new_v4(),
            proposal_id: created.id,
            text: text.to_string(),
            created_at: instant,
        };
        repo.insert_description(&pool, &entry).await.unwrap();
    }

    let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
    let texts: Vec<&str> = stored.descriptions().entries().iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["primeira", "segunda", "terceira"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn removing_a_seller_keeps_their_records(pool: PgPool) {
    let app = state(pool);
    let ana = user(&app, "ana@pingdesk.com.br", UserRole::Seller).await;
    let admin = user(&app, "admin@pingdesk.com.br", UserRole::Admin).await;

    let scope = AccessScope::for_user(&ana);
    let created = app.proposal_service.create_proposal(scope, proposal("Fibra Norte")).await.unwrap();
    app.lead_service.create_lead(scope, lead("Fibra Norte")).await.unwrap();

    app.user_service.delete_user(&admin, ana.id).await.unwrap();

    let everything = AccessScope::for_user(&admin);
    let stored = app.proposal_service.get_proposal(everything, created.id).await.unwrap();
    assert_eq!(stored.seller_id, ana.id);
    assert_eq!(stored.descriptions().len(), 1);
    assert_eq!(app.lead_service.list_leads(everything).await.unwrap().len(), 1);
}
