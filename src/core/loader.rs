use std::{
    borrow::Cow,
    collections::HashSet,
};

use serde_json::Value;

/// Typed view over one JSON object of the scene description. Keys are
/// tracked so unused ones can be reported after loading.
pub struct InputParams {
    params: serde_json::Map<String, Value>,
    name: Cow<'static, str>,
    visited_names: HashSet<String>,
}

macro_rules! params_get {
    ( $( ( $name:ident, $type:ty, $conv:ident, $hint:expr ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[allow(dead_code)]
                pub fn [<get_ $name>](&mut self, key: &str) -> anyhow::Result<$type> {
                    if let Some(value) = self.params.get(key) {
                        if let Some(value) = value.$conv() {
                            self.visited_names.insert(key.to_owned());
                            return Ok(value as $type);
                        }
                        anyhow::bail!(format!("{} - '{}' should be {}", self.name, key, $hint));
                    }
                    anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
                }

                #[allow(dead_code)]
                pub fn [<get_ $name _or>](&mut self, key: &str, fallback: $type) -> $type {
                    if self.params.contains_key(key) {
                        self.[<get_ $name>](key).unwrap_or(fallback)
                    } else {
                        fallback
                    }
                }
            }
        )+
    };
}

impl InputParams {
    pub fn new(params: serde_json::Map<String, Value>, name: Cow<'static, str>) -> Self {
        Self {
            params,
            name,
            visited_names: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: Cow<'static, str>) {
        self.name = name;
    }

    params_get! {
        (int, u32, as_u64, "a non-negative integer"),
        (float, f32, as_f64, "a number"),
        (bool, bool, as_bool, "a boolean"),
    }

    pub fn get_str(&mut self, key: &str) -> anyhow::Result<String> {
        if let Some(value) = self.params.get(key) {
            if let Some(value) = value.as_str() {
                let value = value.to_owned();
                self.visited_names.insert(key.to_owned());
                return Ok(value);
            }
            anyhow::bail!(format!("{} - '{}' should be a string", self.name, key));
        }
        anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
    }

    pub fn get_str_or(&mut self, key: &str, fallback: &str) -> String {
        if self.params.contains_key(key) {
            self.get_str(key).unwrap_or_else(|_| fallback.to_owned())
        } else {
            fallback.to_owned()
        }
    }

    pub fn get_float3(&mut self, key: &str) -> anyhow::Result<[f32; 3]> {
        if let Some(value) = self.params.get(key) {
            let error_info =
                format!("{} - '{}' should be an array of 3 numbers", self.name, key);
            if let Some(arr) = value.as_array() {
                if arr.len() == 3 {
                    let mut result = [0.0; 3];
                    for i in 0..3 {
                        match arr[i].as_f64() {
                            Some(ele) => result[i] = ele as f32,
                            None => anyhow::bail!(error_info),
                        }
                    }
                    self.visited_names.insert(key.to_owned());
                    return Ok(result);
                }
            }
            anyhow::bail!(error_info);
        }
        anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
    }

    pub fn get_float3_or(&mut self, key: &str, fallback: [f32; 3]) -> [f32; 3] {
        if self.params.contains_key(key) {
            self.get_float3(key).unwrap_or(fallback)
        } else {
            fallback
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn get_object(&mut self, key: &str) -> anyhow::Result<InputParams> {
        if let Some(value) = self.params.get(key) {
            if let Some(obj) = value.as_object() {
                let obj = obj.clone();
                self.visited_names.insert(key.to_owned());
                return Ok(InputParams::new(
                    obj,
                    format!("{}-{}", self.name, key).into(),
                ));
            }
            anyhow::bail!(format!("{} - '{}' should be an object", self.name, key));
        }
        anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
    }

    pub fn get_object_array(&mut self, key: &str) -> anyhow::Result<Vec<InputParams>> {
        if let Some(value) = self.params.get(key) {
            let error_info =
                format!("{} - '{}' should be an array of objects", self.name, key);
            if let Some(arr) = value.as_array() {
                let mut result = Vec::with_capacity(arr.len());
                for (i, ele) in arr.iter().enumerate() {
                    match ele.as_object() {
                        Some(obj) => result.push(InputParams::new(
                            obj.clone(),
                            format!("{}-{}-{}", self.name, key, i).into(),
                        )),
                        None => anyhow::bail!(error_info),
                    }
                }
                self.visited_names.insert(key.to_owned());
                return Ok(result);
            }
            anyhow::bail!(error_info);
        }
        anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
    }

    pub fn get_str_array(&mut self, key: &str) -> anyhow::Result<Vec<String>> {
        if let Some(value) = self.params.get(key) {
            let error_info =
                format!("{} - '{}' should be an array of strings", self.name, key);
            if let Some(arr) = value.as_array() {
                let mut result = Vec::with_capacity(arr.len());
                for ele in arr {
                    match ele.as_str() {
                        Some(s) => result.push(s.to_owned()),
                        None => anyhow::bail!(error_info),
                    }
                }
                self.visited_names.insert(key.to_owned());
                return Ok(result);
            }
            anyhow::bail!(error_info);
        }
        anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
    }

    pub fn check_unused_keys(&self) {
        for k in self.params.keys() {
            if !self.visited_names.contains(k) {
                log::warn!("{} - unused key '{}'", self.name, k);
            }
        }
    }
}
