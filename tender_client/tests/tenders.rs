use std::sync::{Arc, Mutex};
use std::time::{Duration, UNIX_EPOCH};
use tender_client::error::Error;
use tender_client::services::{
    tender_service, Tender, TenderService, TenderServiceClient, Timestamp,
};
use tender_client::{async_trait, Bincode, Client};

#[derive(Default)]
struct InMemoryTenders {
    tenders: Mutex<Vec<Tender>>,
    get_calls: Mutex<usize>,
}

#[async_trait]
impl TenderService for InMemoryTenders {
    async fn create_tender(&self, title: String, description: String, end_date: Timestamp) {
        let mut tenders = self.tenders.lock().unwrap();
        let id = tenders.len() as u64 + 1;
        tenders.push(Tender {
            id,
            title,
            description,
            end_date,
        });
    }

    async fn get_tenders(&self) -> Vec<Tender> {
        *self.get_calls.lock().unwrap() += 1;
        self.tenders.lock().unwrap().clone()
    }
}

fn tender(id: u64, title: &str) -> Tender {
    Tender {
        id,
        title: title.to_string(),
        description: format!("{title} description"),
        end_date: Timestamp::from_nanos(id * 1_000),
    }
}

fn loopback(
    backend: Arc<InMemoryTenders>,
) -> TenderServiceClient<Bincode<tokio::io::DuplexStream>> {
    let (client_stream, server_stream) = tokio::io::duplex(4096);

    tokio::spawn(async move {
        let mut transport = Bincode::new(server_stream);
        backend.serve(&mut transport).await
    });

    TenderServiceClient::new(Client::new(
        Bincode::new(client_stream),
        tender_service::interface(),
    ))
}

#[tokio::test]
async fn get_tenders_preserves_order_and_values() -> Result<(), Error> {
    let backend = Arc::new(InMemoryTenders::default());
    backend
        .tenders
        .lock()
        .unwrap()
        .extend([tender(1, "A"), tender(2, "B")]);
    let client = loopback(backend.clone());

    let tenders = client.get_tenders().await?;

    assert_eq!(tenders, vec![tender(1, "A"), tender(2, "B")]);
    assert_eq!(*backend.get_calls.lock().unwrap(), 1);
    Ok(())
}

#[tokio::test]
async fn get_tenders_on_empty_backend() -> Result<(), Error> {
    let client = loopback(Arc::new(InMemoryTenders::default()));
    assert!(client.get_tenders().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_tender_forwards_arguments_verbatim() -> Result<(), Error> {
    let backend = Arc::new(InMemoryTenders::default());
    let client = loopback(backend.clone());
    let end_date = Timestamp::from(UNIX_EPOCH + Duration::from_secs(1_790_000_000));

    client
        .create_tender(
            "Road resurfacing".to_string(),
            "  Lot 4, north section  ".to_string(),
            end_date,
        )
        .await?;

    let stored = backend.tenders.lock().unwrap().clone();
    assert_eq!(
        stored,
        vec![Tender {
            id: 1,
            title: "Road resurfacing".to_string(),
            description: "  Lot 4, north section  ".to_string(),
            end_date,
        }]
    );
    Ok(())
}

#[tokio::test]
async fn created_tenders_are_listed() -> Result<(), Error> {
    let client = loopback(Arc::new(InMemoryTenders::default()));

    client
        .create_tender("A".to_string(), "first".to_string(), Timestamp::from_nanos(5))
        .await?;
    client
        .create_tender("B".to_string(), "second".to_string(), Timestamp::from_nanos(9))
        .await?;

    let titles: Vec<String> = client
        .get_tenders()
        .await?
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["A", "B"]);
    Ok(())
}
