// =============================================================================
// GOOGLE DOCS MODULE
// =============================================================================
//
// Everything that talks to Google lives here:
//
// - `google_docs_client`  - Docs REST API (`DocsApi`)
// - `google_oauth_client` - OAuth token endpoint (`TokenExchanger`)
// - `google_secrets`      - parsing token/client-secret/service-account JSON
//
// The core layer only sees the traits; it never learns which URLs are hit.

pub mod google_docs_client;
pub mod google_oauth_client;
pub mod google_secrets;

pub use google_docs_client::GoogleDocsClient;
pub use google_oauth_client::GoogleTokenClient;
pub use google_secrets::{authorized_user_material, service_account_material};
