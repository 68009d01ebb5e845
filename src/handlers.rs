pub mod crm;
pub mod dashboard;
pub mod extract;
pub mod forms;
pub mod rotas;
