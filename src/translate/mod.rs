pub mod aws_translate;
pub mod deeplx;
pub mod factory;
pub mod handler;
pub mod interface;
pub mod validation;

pub use factory::TranslatorFactory;
pub use handler::TranslationResult;
pub use interface::{
    ProviderError, ProviderTranslation, TranslationProvider, TransportFailure, AUTO_DETECT,
};
pub use validation::{validate_translation_request, TranslationRequest, ValidationErrors};
