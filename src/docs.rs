use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api-docs/openapi.json", get(openapi))
}

async fn openapi() -> Json<Value> {
    Json(openapi_document())
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
    })
}

fn message_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Message" } } }
    })
}

fn id_param() -> Value {
    json!({ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } })
}

fn user_body(required: &[&str]) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": {
            "type": "object",
            "required": required,
            "properties": {
                "Nombre": { "type": "string" },
                "Correo": { "type": "string", "format": "email" },
                "Contrasena": { "type": "string", "format": "password" }
            }
        } } }
    })
}

pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "API de Usuarios",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "API para gestión de usuarios con autenticación"
        },
        "components": {
            "securitySchemes": {
                "bearerAuth": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }
            },
            "schemas": {
                "Error": { "type": "object", "properties": { "error": { "type": "string" } } },
                "Message": { "type": "object", "properties": { "message": { "type": "string" } } },
                "Usuario": {
                    "type": "object",
                    "properties": {
                        "IdUsuario": { "type": "integer" },
                        "Nombre": { "type": "string" },
                        "Correo": { "type": "string" }
                    }
                },
                "Claims": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "nombre": { "type": "string" },
                        "correo": { "type": "string" },
                        "iat": { "type": "integer" },
                        "exp": { "type": "integer" }
                    }
                }
            }
        },
        "paths": {
            "/health": {
                "get": {
                    "summary": "Estado del servicio",
                    "responses": { "200": { "description": "Servicio disponible" } }
                }
            },
            "/usuarios": {
                "get": {
                    "summary": "Listar usuarios",
                    "responses": {
                        "200": {
                            "description": "Lista de usuarios",
                            "content": { "application/json": { "schema": {
                                "type": "array", "items": { "$ref": "#/components/schemas/Usuario" }
                            } } }
                        },
                        "500": error_response("Error del servidor")
                    }
                }
            },
            "/usuarios/{id}": {
                "get": {
                    "summary": "Obtener usuario por ID",
                    "parameters": [id_param()],
                    "responses": {
                        "200": {
                            "description": "Usuario encontrado",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Usuario" } } }
                        },
                        "404": error_response("Usuario no encontrado")
                    }
                }
            },
            "/crearusuario": {
                "post": {
                    "summary": "Crear usuario",
                    "requestBody": user_body(&["Nombre", "Correo", "Contrasena"]),
                    "responses": {
                        "201": message_response("Usuario creado"),
                        "400": error_response("Faltan campos requeridos"),
                        "409": error_response("El correo ya está registrado")
                    }
                }
            },
            "/login": {
                "post": {
                    "summary": "Iniciar sesión",
                    "requestBody": user_body(&["Correo", "Contrasena"]),
                    "responses": {
                        "200": {
                            "description": "Login exitoso",
                            "content": { "application/json": { "schema": {
                                "type": "object",
                                "properties": {
                                    "message": { "type": "string" },
                                    "token": { "type": "string" },
                                    "usuario": {
                                        "type": "object",
                                        "properties": {
                                            "id": { "type": "integer" },
                                            "nombre": { "type": "string" },
                                            "correo": { "type": "string" }
                                        }
                                    }
                                }
                            } } }
                        },
                        "400": error_response("Correo y contraseña son requeridos"),
                        "401": error_response("Credenciales inválidas")
                    }
                }
            },
            "/perfil": {
                "get": {
                    "summary": "Perfil del usuario autenticado",
                    "security": [{ "bearerAuth": [] }],
                    "responses": {
                        "200": {
                            "description": "Datos del token",
                            "content": { "application/json": { "schema": {
                                "type": "object",
                                "properties": { "usuario": { "$ref": "#/components/schemas/Claims" } }
                            } } }
                        },
                        "401": error_response("Token inválido"),
                        "403": error_response("Token no proporcionado")
                    }
                }
            },
            "/actualizarusuario/{id}": {
                "put": {
                    "summary": "Actualizar usuario",
                    "parameters": [id_param()],
                    "requestBody": user_body(&[]),
                    "responses": {
                        "200": message_response("Usuario actualizado"),
                        "400": error_response("No hay campos para actualizar"),
                        "404": error_response("Usuario no encontrado"),
                        "409": error_response("El correo ya está registrado")
                    }
                }
            },
            "/eliminarusuario/{id}": {
                "delete": {
                    "summary": "Eliminar usuario",
                    "parameters": [id_param()],
                    "responses": {
                        "200": message_response("Usuario eliminado"),
                        "404": error_response("Usuario no encontrado")
                    }
                }
            }
        }
    })
}
