mod types;

pub use types::{
    CorrectRequest, CorrectResponse, PictogramResult, TranslateRequest, TranslateResponse,
    TranslatedWord, TranslationItem,
};
