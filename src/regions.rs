//! Fixed locality and boilerplate lists for the Espírito Santo alert site.
//!
//! All names are lower-case so they can be matched against lower-cased text.

/// Localities the bulletin classifier looks for unless `TARGET_LOCALITIES`
/// overrides them.
pub const DEFAULT_TARGET_LOCALITIES: &[&str] = &["santa maria de jetibá"];

/// Municipalities used by the `filtro_serrana` alert filter.
pub const SERRANA_FILTER_MUNICIPALITIES: &[&str] = &["santa maria de jetibá"];

/// The full highland municipality group, used by the bulletin scan tool.
pub const SERRANA_MUNICIPALITIES: &[&str] = &[
    "domingos martins",
    "marechal floriano",
    "santa maria de jetibá",
    "santa teresa",
    "venda nova do imigrante",
    "afonso cláudio",
    "castelo",
    "vargem alta",
    "conceição do castelo",
    "brejetuba",
    "laranja da terra",
    "itaguaçu",
    "itarana",
    "santa leopoldina",
    "ibitirama",
    "divino de são lourenço",
    "dores do rio preto",
];

/// Fixed page text on the alert listing that is never an actual alert.
/// Matched case-insensitively as a substring.
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "Para se cadastrar e começar a receber SMS",
    "O sistema de envio de SMS",
    "A iniciativa é fruto da parceria",
    "ALERTAS VIGENTES",
    "Produtos",
    "Avisos",
    "Alertas",
    "Boletim Extraordinário",
    "Boletim Geo-Hidrológico",
    "Boletim Meteorológico",
    "Desastres no Espírito Santo: Danos e Prejuízos",
    "Previsão Climática Sazonal",
    "Mapas de Risco",
    "Monitor de Secas",
    "Boletim Mensal do Alerta!",
    "Contato",
    "Defesa Civil Regional e Municipal",
    "Fale Conosco",
    "Governo do Estado do Espírito Santo",
];

/// Site paths of the scraped listing pages.
pub const ALERTS_PATH: &str = "/alertas";
pub const METEOROLOGICAL_BULLETIN_PATH: &str = "/boletim-meteorologico";
pub const EXTRAORDINARY_BULLETIN_PATH: &str = "/boletim-extraordinario-de-defesa-civil";
