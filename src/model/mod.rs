pub mod planka;
pub mod trello;
