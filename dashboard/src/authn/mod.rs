pub mod session_mngr;
