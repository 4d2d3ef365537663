pub mod crm_client;
