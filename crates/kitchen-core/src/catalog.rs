//! Static kitchen catalog - object kinds, transformation tables and recipes
//!
//! The catalog is loaded once at startup (usually from JSON) and is read-only
//! afterwards. Kinds are interned into [`KindId`]s so the rest of the
//! simulation compares them by identity instead of by name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Interned identity of a [`KitchenObjectKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KindId(pub u16);

/// Index of a [`RecipeDefinition`] in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u16);

/// Immutable classification of a kitchen item (raw tomato, plate, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenObjectKind {
    pub id: KindId,
    pub name: String,
    /// Opaque reference for the rendering collaborator (prefab, sprite)
    pub visual: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuttingRecipe {
    pub input: KindId,
    pub output: KindId,
    pub steps: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FryingRecipe {
    pub input: KindId,
    pub output: KindId,
    /// Seconds on the stove before the output appears
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurningRecipe {
    pub input: KindId,
    pub output: KindId,
    /// Seconds a fried item survives before it burns
    pub duration: f32,
}

/// A dish that can be ordered. Ingredients are a set: matching is by presence.
#[derive(Debug, Clone)]
pub struct RecipeDefinition {
    pub id: RecipeId,
    pub name: String,
    pub ingredients: Vec<KindId>,
}

impl RecipeDefinition {
    /// Set equality between the recipe and a plate's contents
    pub fn matches(&self, contents: &[KindId]) -> bool {
        self.ingredients.len() == contents.len()
            && self.ingredients.iter().all(|kind| contents.contains(kind))
    }
}

// ============================================================================
// RAW DEFINITION (what the JSON file looks like)
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDefinition {
    pub kinds: Vec<KindDef>,
    pub plate: PlateDef,
    #[serde(default)]
    pub cutting: Vec<CuttingDef>,
    #[serde(default)]
    pub frying: Vec<TimedDef>,
    #[serde(default)]
    pub burning: Vec<TimedDef>,
    #[serde(default)]
    pub recipes: Vec<RecipeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindDef {
    pub name: String,
    #[serde(default)]
    pub visual: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlateDef {
    pub kind: String,
    pub allowed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuttingDef {
    pub input: String,
    pub output: String,
    pub steps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedDef {
    pub input: String,
    pub output: String,
    pub duration: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDef {
    pub name: String,
    pub ingredients: Vec<String>,
}

impl CatalogDefinition {
    /// Register a kind by name, visual defaults to the name
    pub fn with_kind(mut self, name: &str) -> Self {
        self.kinds.push(KindDef {
            name: name.to_string(),
            visual: name.to_string(),
        });
        self
    }

    pub fn with_plate(mut self, kind: &str, allowed: &[&str]) -> Self {
        self.plate = PlateDef {
            kind: kind.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        };
        self
    }

    pub fn with_cutting(mut self, input: &str, output: &str, steps: u32) -> Self {
        self.cutting.push(CuttingDef {
            input: input.to_string(),
            output: output.to_string(),
            steps,
        });
        self
    }

    pub fn with_frying(mut self, input: &str, output: &str, duration: f32) -> Self {
        self.frying.push(TimedDef {
            input: input.to_string(),
            output: output.to_string(),
            duration,
        });
        self
    }

    pub fn with_burning(mut self, input: &str, output: &str, duration: f32) -> Self {
        self.burning.push(TimedDef {
            input: input.to_string(),
            output: output.to_string(),
            duration,
        });
        self
    }

    pub fn with_recipe(mut self, name: &str, ingredients: &[&str]) -> Self {
        self.recipes.push(RecipeDef {
            name: name.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        });
        self
    }
}

// ============================================================================
// VALIDATED CATALOG
// ============================================================================

/// Configuration problems found while loading the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("kind '{0}' is declared more than once")]
    DuplicateKind(String),

    #[error("unknown kind '{name}' referenced by {context}")]
    UnknownKind { name: String, context: String },

    #[error("{table} recipes declare input '{input}' more than once")]
    DuplicateInput { table: &'static str, input: String },

    #[error("cutting recipe for '{0}' requires zero steps")]
    ZeroSteps(String),

    #[error("{table} recipe for '{input}' has non-positive duration {duration}")]
    BadDuration {
        table: &'static str,
        input: String,
        duration: f32,
    },

    #[error("catalog declares no plate kind")]
    MissingPlate,

    #[error("catalog declares at least {0} kinds, more than ids can address")]
    TooManyKinds(usize),

    #[error("catalog declares at least {0} recipes, more than ids can address")]
    TooManyRecipes(usize),

    #[error("recipe '{recipe}' needs '{ingredient}' but plates do not accept it")]
    IngredientNotPlateable { recipe: String, ingredient: String },
}

/// Validated, interned catalog shared by every system
#[derive(Debug, Clone)]
pub struct KitchenCatalog {
    kinds: Vec<KitchenObjectKind>,
    by_name: HashMap<String, KindId>,
    plate_kind: KindId,
    plate_allowed: Vec<KindId>,
    cutting: Vec<CuttingRecipe>,
    frying: Vec<FryingRecipe>,
    burning: Vec<BurningRecipe>,
    recipes: Vec<RecipeDefinition>,
}

impl KitchenCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definition: CatalogDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    pub fn from_definition(definition: CatalogDefinition) -> Result<Self, CatalogError> {
        let mut kinds = Vec::with_capacity(definition.kinds.len());
        let mut by_name = HashMap::new();
        for (index, def) in definition.kinds.into_iter().enumerate() {
            let id = u16::try_from(index)
                .map(KindId)
                .map_err(|_| CatalogError::TooManyKinds(index + 1))?;
            if by_name.insert(def.name.clone(), id).is_some() {
                return Err(CatalogError::DuplicateKind(def.name));
            }
            let visual = if def.visual.is_empty() {
                def.name.clone()
            } else {
                def.visual
            };
            kinds.push(KitchenObjectKind {
                id,
                name: def.name,
                visual,
            });
        }

        let resolve = |name: &str, context: &str| -> Result<KindId, CatalogError> {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| CatalogError::UnknownKind {
                    name: name.to_string(),
                    context: context.to_string(),
                })
        };

        if definition.plate.kind.is_empty() {
            return Err(CatalogError::MissingPlate);
        }
        let plate_kind = resolve(&definition.plate.kind, "plate")?;
        let mut plate_allowed = Vec::new();
        for name in &definition.plate.allowed {
            let id = resolve(name, "plate allowed list")?;
            if !plate_allowed.contains(&id) {
                plate_allowed.push(id);
            }
        }

        let mut cutting: Vec<CuttingRecipe> = Vec::new();
        for def in &definition.cutting {
            let input = resolve(&def.input, "cutting recipe")?;
            let output = resolve(&def.output, "cutting recipe")?;
            if def.steps == 0 {
                return Err(CatalogError::ZeroSteps(def.input.clone()));
            }
            if cutting.iter().any(|r| r.input == input) {
                return Err(CatalogError::DuplicateInput {
                    table: "cutting",
                    input: def.input.clone(),
                });
            }
            cutting.push(CuttingRecipe {
                input,
                output,
                steps: def.steps,
            });
        }

        let mut frying: Vec<FryingRecipe> = Vec::new();
        for def in &definition.frying {
            let (input, output) = resolve_timed(def, "frying", &resolve)?;
            if frying.iter().any(|r| r.input == input) {
                return Err(CatalogError::DuplicateInput {
                    table: "frying",
                    input: def.input.clone(),
                });
            }
            frying.push(FryingRecipe {
                input,
                output,
                duration: def.duration,
            });
        }

        let mut burning: Vec<BurningRecipe> = Vec::new();
        for def in &definition.burning {
            let (input, output) = resolve_timed(def, "burning", &resolve)?;
            if burning.iter().any(|r| r.input == input) {
                return Err(CatalogError::DuplicateInput {
                    table: "burning",
                    input: def.input.clone(),
                });
            }
            burning.push(BurningRecipe {
                input,
                output,
                duration: def.duration,
            });
        }

        let mut recipes = Vec::with_capacity(definition.recipes.len());
        for (index, def) in definition.recipes.iter().enumerate() {
            let mut ingredients = Vec::new();
            for name in &def.ingredients {
                let id = resolve(name, &format!("recipe '{}'", def.name))?;
                if !plate_allowed.contains(&id) {
                    return Err(CatalogError::IngredientNotPlateable {
                        recipe: def.name.clone(),
                        ingredient: name.clone(),
                    });
                }
                if ingredients.contains(&id) {
                    log::warn!("recipe '{}' lists '{}' twice", def.name, name);
                } else {
                    ingredients.push(id);
                }
            }
            recipes.push(RecipeDefinition {
                id: u16::try_from(index)
                    .map(RecipeId)
                    .map_err(|_| CatalogError::TooManyRecipes(index + 1))?,
                name: def.name.clone(),
                ingredients,
            });
        }
        if recipes.is_empty() {
            log::warn!("catalog has no recipes; no orders will ever spawn");
        }

        Ok(Self {
            kinds,
            by_name,
            plate_kind,
            plate_allowed,
            cutting,
            frying,
            burning,
            recipes,
        })
    }

    pub fn kind(&self, id: KindId) -> Option<&KitchenObjectKind> {
        self.kinds.get(id.0 as usize)
    }

    pub fn kind_name(&self, id: KindId) -> &str {
        self.kind(id).map(|k| k.name.as_str()).unwrap_or("<unknown>")
    }

    /// Look up a kind by its configured name
    pub fn find(&self, name: &str) -> Option<KindId> {
        self.by_name.get(name).copied()
    }

    pub fn kinds(&self) -> &[KitchenObjectKind] {
        &self.kinds
    }

    pub fn plate_kind(&self) -> KindId {
        self.plate_kind
    }

    pub fn plate_allowed(&self) -> &[KindId] {
        &self.plate_allowed
    }

    pub fn cutting_recipe(&self, input: KindId) -> Option<CuttingRecipe> {
        self.cutting.iter().find(|r| r.input == input).copied()
    }

    pub fn frying_recipe(&self, input: KindId) -> Option<FryingRecipe> {
        self.frying.iter().find(|r| r.input == input).copied()
    }

    pub fn burning_recipe(&self, input: KindId) -> Option<BurningRecipe> {
        self.burning.iter().find(|r| r.input == input).copied()
    }

    pub fn recipes(&self) -> &[RecipeDefinition] {
        &self.recipes
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&RecipeDefinition> {
        self.recipes.get(id.0 as usize)
    }

    pub fn recipe_by_name(&self, name: &str) -> Option<&RecipeDefinition> {
        self.recipes.iter().find(|r| r.name == name)
    }
}

fn resolve_timed(
    def: &TimedDef,
    table: &'static str,
    resolve: &impl Fn(&str, &str) -> Result<KindId, CatalogError>,
) -> Result<(KindId, KindId), CatalogError> {
    let context = format!("{} recipe", table);
    let input = resolve(&def.input, &context)?;
    let output = resolve(&def.output, &context)?;
    if !(def.duration > 0.0) {
        return Err(CatalogError::BadDuration {
            table,
            input: def.input.clone(),
            duration: def.duration,
        });
    }
    Ok((input, output))
}
