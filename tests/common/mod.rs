#![allow(dead_code)]

use flixdex::config::Config;
use flixdex::db::Store;
use flixdex::services::ingest::parse_catalog;

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Eight shows covering every filter: multi-category rows, a show without a
/// rating, shows without a year and comma-separated country fields.
pub const CATALOG_CSV: &str = "\
show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description
s1,Movie,A,,,United States,\"January 1, 2020\",2010,PG,90 min,Dramas,A quiet drama.
s2,Movie,B,,,India,,2020,TV-MA,100 min,Comedies,Funny.
s3,Movie,Crazy Love,Ann Director,,\" France, India \",,2015,R,95 min,\"Dramas, Romantic Movies\",Romance.
s4,TV Show,Deep Sea,Lovelace Jones,,United Kingdom,,2015,TV-MA,1 Season,Docuseries,Under water.
s5,Movie,Echo,,Jane Lovett,\"United States, Canada\",,2015,,88 min,\"Dramas, Thrillers\",Suspense.
s6,Movie,Foxtrot,,,,,,PG,101 min,International Movies,A story of LOVE and war.
s7,TV Show,Glove Box,,,,,2018,TV-14,2 Seasons,TV Comedies,Sketches.
s8,Movie,Hidden,,,,,2015.0,PG-13,97 min,Dramas,Nothing to see.
";

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_url = "sqlite::memory:".to_string();
    config.security.jwt_secret = Some(JWT_SECRET.to_string());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

pub async fn empty_store() -> Store {
    Store::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store")
}

pub async fn seed(store: &Store, csv: &str) {
    let import = parse_catalog(csv.as_bytes()).expect("fixture CSV parses");
    store
        .import_catalog(&import)
        .await
        .expect("fixture import succeeds");
}

pub async fn seeded_store() -> Store {
    let store = empty_store().await;
    seed(&store, CATALOG_CSV).await;
    store
}
