use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

#[wasm_bindgen]
pub fn generate_paper(config: JsValue, pool: JsValue) -> JsValue {
    let config: schema::GenerationConfig = from_value(config).unwrap();
    let pool: Vec<schema::Question> = from_value(pool).unwrap();

    match paper_utils::generation::generate_paper(&config, &pool) {
        Ok(paper) => to_value(&paper).unwrap(),
        Err(e) => to_value(&e.to_string()).unwrap(),
    }
}

#[wasm_bindgen]
pub fn get_alternative_question(current: JsValue, pool: JsValue, exclude_ids: JsValue) -> JsValue {
    let current: schema::Question = from_value(current).unwrap();
    let pool: Vec<schema::Question> = from_value(pool).unwrap();
    let exclude_ids: Vec<String> = from_value(exclude_ids).unwrap();

    match paper_utils::generation::get_alternative_question(&current, &pool, &exclude_ids) {
        Some(question) => to_value(&question).unwrap(),
        None => JsValue::null(),
    }
}

#[wasm_bindgen]
pub fn validate_paper(paper: JsValue) -> JsValue {
    let paper: schema::GeneratedPaper = from_value(paper).unwrap();
    let res = paper_utils::generation::validate_paper(&paper);

    if let Err(e) = res {
        return to_value(&e.to_string()).unwrap();
    }

    JsValue::null()
}
