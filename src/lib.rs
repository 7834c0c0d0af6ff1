pub mod ai_prediction;
pub mod html_table;
pub mod http_client;
pub mod live_fetch;
pub mod markets;
pub mod page_cache;
pub mod page_fetch;
pub mod player_stats;
pub mod profit;
pub mod radar;
pub mod rankings;
pub mod results_fetch;
pub mod saved_games;
pub mod smart_tips;
pub mod state;
