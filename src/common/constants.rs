//! Defaults shared by the configuration layer, the CLI and the HTTP routes.

pub const SERVICE_NAME: &str = "etec-api";

// Server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

// File locations
pub const DEFAULT_DATA_PATH: &str = "etecs.json";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "etec_api.log";

// Environment overrides (read after .env is loaded)
pub const ENV_HOST: &str = "ETEC_API_HOST";
pub const ENV_PORT: &str = "ETEC_API_PORT";
pub const ENV_DATA_PATH: &str = "ETEC_API_DATA";

// Canonical city used by the built-in correction table
pub const SAO_PAULO: &str = "são paulo";

// Response messages
pub const BANNER: &str =
    "Servidor de API ETECs rodando. Use /etecs, /cidades, /cursos, /modalidades, /estatisticas ou /busca para filtrar.";
pub const MSG_MISSING_CITY: &str = "Informe a cidade";
pub const MSG_MISSING_COURSE: &str = "Informe o curso";
pub const MSG_MISSING_NAME: &str = "Informe o nome da ETEC";
pub const MSG_MISSING_MODALITY: &str = "Informe a modalidade";
pub const MSG_NO_CITY_MATCH: &str = "Nenhuma ETEC encontrada para esta cidade.";
pub const MSG_NO_COURSE_MATCH: &str = "Nenhuma ETEC oferece este curso.";
pub const MSG_NO_NAME_MATCH: &str = "Nenhuma ETEC encontrada com esse nome.";
pub const MSG_NO_MODALITY_MATCH: &str = "Nenhuma ETEC oferece cursos nesta modalidade.";
pub const MSG_NO_SEARCH_MATCH: &str = "Nenhuma ETEC encontrada para os filtros informados.";
