pub mod add_game_form;
pub mod game_list;
pub mod review_list;

pub use add_game_form::{AddGameForm, FormMode};
pub use game_list::GameListView;
pub use review_list::ReviewListView;
