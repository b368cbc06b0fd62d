use super::FieldType::{Date, File, Multiselect, Number, Packing, Products, Select, Text, Textarea};
use super::{DocumentType, FieldDefinition as F};

const YES_NO: &[&str] = &["Yes", "No"];
const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "INR", "AED", "JPY", "CNY", "AUD", "SGD"];
const INCOTERMS: &[&str] = &["EXW", "FCA", "FAS", "FOB", "CFR", "CIF", "CPT", "CIP", "DAP", "DPU", "DDP"];
const PAYMENT_TERMS: &[&str] = &[
    "Advance Payment",
    "Letter of Credit",
    "Documents Against Payment",
    "Documents Against Acceptance",
    "Open Account",
];
const FREIGHT_TERMS: &[&str] = &["Prepaid", "Collect"];
const SHIPMENT_MODES: &[&str] = &["Sea", "Air", "Road", "Rail"];
const IMAGE: &str = "image/*";

pub static COMMON_FIELDS: &[F] = &[
    F::new("exporter_company_name", "What is your company's name?", Text, true, "Exporter"),
    F::new("exporter_address", "What is your company's registered address?", Textarea, true, "Exporter"),
    F::new("exporter_gstin", "What is your GSTIN / tax ID?", Text, true, "Exporter"),
    F::new("exporter_iec", "What is your Importer-Exporter Code (IEC)?", Text, false, "Exporter"),
    F::new("exporter_email", "Which email address should appear on the documents?", Text, false, "Exporter"),
    F::new("exporter_phone", "Which phone number should appear on the documents?", Text, false, "Exporter"),
    F::new("company_logo", "Upload your company logo (optional).", File, false, "Exporter").with_accept(IMAGE),
    F::new("buyer_name", "Who is the buyer (company name)?", Text, true, "Buyer"),
    F::new("buyer_address", "What is the buyer's address?", Textarea, true, "Buyer"),
    F::new("buyer_country", "Which country is the buyer in?", Text, true, "Buyer"),
    F::new("consignee_same_as_buyer", "Is the consignee the same as the buyer?", Select, true, "Consignee")
        .with_options(YES_NO),
    F::new("consignee_name", "What is the consignee's name?", Text, true, "Consignee")
        .when("consignee_same_as_buyer", "No"),
    F::new("consignee_address", "What is the consignee's address?", Textarea, true, "Consignee")
        .when("consignee_same_as_buyer", "No"),
    F::new("currency", "Which currency are the amounts in?", Select, true, "Payment").with_options(CURRENCIES),
];

const INVOICE_NUMBER: F = F::new(
    "invoice_number",
    "Invoice number? (skip to generate one automatically)",
    Text,
    false,
    "Invoice",
);
const INVOICE_DATE: F = F::new("invoice_date", "Invoice date (YYYY-MM-DD)?", Date, false, "Invoice");
const BUYER_ORDER_NUMBER: F = F::new("buyer_order_number", "Buyer's order / PO reference?", Text, false, "Invoice");
const INCOTERM: F = F::new("incoterms", "Which Incoterm applies?", Select, true, "Shipment").with_options(INCOTERMS);
const PAYMENT: F = F::new("payment_terms", "What are the payment terms?", Select, true, "Payment")
    .with_options(PAYMENT_TERMS);
const LC_NUMBER: F = F::new("lc_number", "Letter of credit number?", Text, true, "Payment")
    .when("payment_terms", "Letter of Credit");
const COUNTRY_OF_ORIGIN: F = F::new("country_of_origin", "Country of origin of the goods?", Text, true, "Shipment");
const COUNTRY_OF_DESTINATION: F = F::new(
    "country_of_destination",
    "Country of final destination?",
    Text,
    true,
    "Shipment",
);
const PORT_OF_LOADING: F = F::new("port_of_loading", "Port of loading?", Text, true, "Shipment");
const PORT_OF_DISCHARGE: F = F::new("port_of_discharge", "Port of discharge?", Text, true, "Shipment");
const FINAL_DESTINATION: F = F::new("final_destination", "Place of final delivery?", Text, false, "Shipment");
const VESSEL: F = F::new("vessel_name", "Vessel / voyage number?", Text, false, "Shipment");
const SHIPMENT_MODE: F = F::new("shipment_mode", "Mode of shipment?", Select, true, "Shipment")
    .with_options(SHIPMENT_MODES);
const SHIPMENT_DATE: F = F::new("shipment_date", "Expected shipment date (YYYY-MM-DD)?", Date, false, "Shipment");
const MARKS: F = F::new("marks_and_numbers", "Shipping marks and numbers?", Textarea, false, "Shipment");
const PRODUCTS: F = F::new("products", "Add the products in this shipment.", Products, true, "Products");
const PACKING: F = F::new("packing_info", "Add packing details for each product.", Packing, true, "Packing");
const NOTIFY_SAME: F = F::new(
    "notify_same_as_consignee",
    "Is the notify party the same as the consignee?",
    Select,
    true,
    "Notify Party",
)
.with_options(YES_NO);
const NOTIFY_NAME: F = F::new("notify_party_name", "Notify party name?", Text, true, "Notify Party")
    .when("notify_same_as_consignee", "No");
const NOTIFY_ADDRESS: F = F::new("notify_party_address", "Notify party address?", Textarea, true, "Notify Party")
    .when("notify_same_as_consignee", "No");
const FREIGHT: F = F::new("freight_terms", "Is freight prepaid or collect?", Select, true, "Shipment")
    .with_options(FREIGHT_TERMS);
const FREIGHT_PAYABLE_AT: F = F::new("freight_payable_at", "Where is freight payable?", Text, true, "Shipment")
    .when("freight_terms", "Collect");
const BANK_DETAILS: F = F::new("bank_details", "Bank details for payment (bank, account, SWIFT)?", Textarea, false, "Payment");
const REMARKS: F = F::new("remarks", "Any additional remarks?", Textarea, false, "Other");
const SIGNATORY: F = F::new("authorized_signatory", "Name of the authorised signatory?", Text, true, "Signature");
const SIGNATURE: F = F::new("signature", "Upload a signature image (optional).", File, false, "Signature")
    .with_accept(IMAGE);

static COMMERCIAL_INVOICE: &[F] = &[
    INVOICE_NUMBER,
    INVOICE_DATE,
    BUYER_ORDER_NUMBER,
    INCOTERM,
    PAYMENT,
    LC_NUMBER,
    COUNTRY_OF_ORIGIN,
    COUNTRY_OF_DESTINATION,
    PORT_OF_LOADING,
    PORT_OF_DISCHARGE,
    VESSEL,
    PRODUCTS,
    BANK_DETAILS,
    REMARKS,
    SIGNATORY,
    SIGNATURE,
];

static PROFORMA_INVOICE: &[F] = &[
    F::new("proforma_number", "Proforma invoice number? (skip to generate one)", Text, false, "Proforma"),
    F::new("proforma_date", "Proforma date (YYYY-MM-DD)?", Date, false, "Proforma"),
    F::new("validity_days", "How many days is this offer valid?", Number, false, "Proforma"),
    INCOTERM,
    PAYMENT,
    LC_NUMBER,
    PORT_OF_LOADING,
    PORT_OF_DISCHARGE,
    PRODUCTS,
    BANK_DETAILS,
    REMARKS,
    SIGNATORY,
    SIGNATURE,
];

static PACKING_LIST: &[F] = &[
    INVOICE_NUMBER,
    INVOICE_DATE,
    F::new("packing_list_number", "Packing list number? (skip to generate one)", Text, false, "Packing"),
    PORT_OF_LOADING,
    PORT_OF_DISCHARGE,
    VESSEL,
    MARKS,
    PRODUCTS,
    PACKING,
    REMARKS,
    SIGNATORY,
    SIGNATURE,
];

static BILL_OF_LADING: &[F] = &[
    F::new("bl_number", "Bill of lading number? (skip to generate one)", Text, false, "Bill of Lading"),
    F::new("carrier_name", "Shipping line / carrier name?", Text, true, "Bill of Lading"),
    NOTIFY_SAME,
    NOTIFY_NAME,
    NOTIFY_ADDRESS,
    VESSEL,
    PORT_OF_LOADING,
    PORT_OF_DISCHARGE,
    FINAL_DESTINATION,
    FREIGHT,
    FREIGHT_PAYABLE_AT,
    F::new("number_of_originals", "Number of original B/Ls?", Select, false, "Bill of Lading")
        .with_options(&["1", "2", "3"]),
    MARKS,
    PRODUCTS,
    PACKING,
    SIGNATORY,
    SIGNATURE,
];

static AIR_WAYBILL: &[F] = &[
    F::new("awb_number", "Air waybill number? (skip to generate one)", Text, false, "Air Waybill"),
    F::new("airline_name", "Issuing airline?", Text, true, "Air Waybill"),
    F::new("flight_number", "Flight number?", Text, false, "Air Waybill"),
    F::new("airport_of_departure", "Airport of departure?", Text, true, "Air Waybill"),
    F::new("airport_of_destination", "Airport of destination?", Text, true, "Air Waybill"),
    NOTIFY_SAME,
    NOTIFY_NAME,
    NOTIFY_ADDRESS,
    F::new("handling_information", "Special handling information?", Textarea, false, "Air Waybill"),
    F::new("declared_value_carriage", "Declared value for carriage (or NVD)?", Text, false, "Air Waybill"),
    PRODUCTS,
    PACKING,
    SIGNATORY,
    SIGNATURE,
];

static CERTIFICATE_OF_ORIGIN: &[F] = &[
    F::new("coo_number", "Certificate number? (skip to generate one)", Text, false, "Certificate"),
    INVOICE_NUMBER,
    INVOICE_DATE,
    COUNTRY_OF_ORIGIN,
    COUNTRY_OF_DESTINATION,
    SHIPMENT_MODE,
    PORT_OF_LOADING,
    PORT_OF_DISCHARGE,
    F::new(
        "preferential_treatment",
        "Is preferential tariff treatment claimed under a trade agreement?",
        Select,
        true,
        "Certificate",
    )
    .with_options(YES_NO),
    F::new("trade_agreement", "Which trade agreement?", Text, true, "Certificate")
        .when("preferential_treatment", "Yes"),
    F::new("issuing_authority", "Issuing chamber / authority?", Text, false, "Certificate"),
    MARKS,
    PRODUCTS,
    SIGNATORY,
    SIGNATURE,
];

static SHIPPING_INSTRUCTIONS: &[F] = &[
    F::new("si_number", "Shipping instruction reference? (skip to generate one)", Text, false, "Instructions"),
    F::new("forwarder_name", "Freight forwarder name?", Text, true, "Instructions"),
    F::new("booking_number", "Carrier booking number?", Text, false, "Instructions"),
    NOTIFY_SAME,
    NOTIFY_NAME,
    NOTIFY_ADDRESS,
    SHIPMENT_MODE,
    PORT_OF_LOADING,
    PORT_OF_DISCHARGE,
    SHIPMENT_DATE,
    FREIGHT,
    FREIGHT_PAYABLE_AT,
    F::new(
        "documents_required",
        "Which documents must accompany the shipment?",
        Multiselect,
        false,
        "Instructions",
    )
    .with_options(&[
        "Commercial Invoice",
        "Packing List",
        "Bill of Lading",
        "Certificate of Origin",
        "Insurance Certificate",
    ]),
    F::new("special_instructions", "Any special instructions for the forwarder?", Textarea, false, "Instructions"),
    PRODUCTS,
    PACKING,
    SIGNATORY,
    SIGNATURE,
];

static INSURANCE_CERTIFICATE: &[F] = &[
    F::new("policy_number", "Insurance policy number?", Text, true, "Insurance"),
    F::new("certificate_number", "Certificate number? (skip to generate one)", Text, false, "Insurance"),
    F::new("insurer_name", "Insurance company?", Text, true, "Insurance"),
    F::new("insured_value_percent", "Insured value as % of invoice value (e.g. 110)?", Number, false, "Insurance"),
    F::new("coverage_type", "Coverage clauses?", Select, true, "Insurance")
        .with_options(&["Institute Cargo Clauses (A)", "Institute Cargo Clauses (B)", "Institute Cargo Clauses (C)"]),
    F::new(
        "claims_payable_abroad",
        "Are claims payable at destination through an agent?",
        Select,
        true,
        "Insurance",
    )
    .with_options(YES_NO),
    F::new("claims_agent", "Name and address of the claims agent?", Textarea, true, "Insurance")
        .when("claims_payable_abroad", "Yes"),
    VESSEL,
    PORT_OF_LOADING,
    PORT_OF_DISCHARGE,
    SHIPMENT_DATE,
    PRODUCTS,
    SIGNATORY,
    SIGNATURE,
];

static PURCHASE_ORDER: &[F] = &[
    F::new("po_number", "Purchase order number? (skip to generate one)", Text, false, "Purchase Order"),
    F::new("po_date", "Purchase order date (YYYY-MM-DD)?", Date, false, "Purchase Order"),
    F::new("delivery_date", "Required delivery date (YYYY-MM-DD)?", Date, false, "Purchase Order"),
    F::new("delivery_address", "Delivery address?", Textarea, false, "Purchase Order"),
    INCOTERM,
    PAYMENT,
    LC_NUMBER,
    PRODUCTS,
    REMARKS,
    SIGNATORY,
    SIGNATURE,
];

static DELIVERY_CHALLAN: &[F] = &[
    F::new("challan_number", "Delivery challan number? (skip to generate one)", Text, false, "Challan"),
    F::new("challan_date", "Challan date (YYYY-MM-DD)?", Date, false, "Challan"),
    F::new("transporter_name", "Transporter name?", Text, true, "Challan"),
    F::new("vehicle_number", "Vehicle number?", Text, false, "Challan"),
    F::new("eway_bill_number", "E-way bill number?", Text, false, "Challan"),
    F::new("challan_purpose", "Purpose of the movement?", Select, true, "Challan")
        .with_options(&["Supply", "Job Work", "Sales Return", "Exhibition", "Other"]),
    PRODUCTS,
    REMARKS,
    SIGNATORY,
    SIGNATURE,
];

static SHIPPING_BILL: &[F] = &[
    F::new("shipping_bill_number", "Shipping bill number? (skip to generate one)", Text, false, "Customs"),
    F::new("customs_house_agent", "Customs house agent?", Text, false, "Customs"),
    INVOICE_NUMBER,
    INVOICE_DATE,
    F::new("export_scheme", "Export promotion scheme?", Select, true, "Customs")
        .with_options(&["None", "Drawback", "RoDTEP", "EPCG", "Advance Authorisation"]),
    F::new("scheme_reference", "Scheme licence / authorisation number?", Text, true, "Customs")
        .when("export_scheme", "EPCG"),
    PORT_OF_LOADING,
    PORT_OF_DISCHARGE,
    COUNTRY_OF_DESTINATION,
    INCOTERM,
    PRODUCTS,
    SIGNATORY,
    SIGNATURE,
];

static CREDIT_NOTE: &[F] = &[
    F::new("credit_note_number", "Credit note number? (skip to generate one)", Text, false, "Note"),
    F::new("note_date", "Note date (YYYY-MM-DD)?", Date, false, "Note"),
    F::new("reference_invoice_number", "Which invoice does this note adjust?", Text, true, "Note"),
    F::new("reference_invoice_date", "Date of that invoice (YYYY-MM-DD)?", Date, false, "Note"),
    F::new("note_reason", "Reason for the adjustment?", Textarea, true, "Note"),
    PRODUCTS,
    SIGNATORY,
    SIGNATURE,
];

static DEBIT_NOTE: &[F] = &[
    F::new("debit_note_number", "Debit note number? (skip to generate one)", Text, false, "Note"),
    F::new("note_date", "Note date (YYYY-MM-DD)?", Date, false, "Note"),
    F::new("reference_invoice_number", "Which invoice does this note adjust?", Text, true, "Note"),
    F::new("reference_invoice_date", "Date of that invoice (YYYY-MM-DD)?", Date, false, "Note"),
    F::new("note_reason", "Reason for the adjustment?", Textarea, true, "Note"),
    PRODUCTS,
    SIGNATORY,
    SIGNATURE,
];

pub(super) fn type_fields(doc: DocumentType) -> &'static [F] {
    match doc {
        DocumentType::CommercialInvoice => COMMERCIAL_INVOICE,
        DocumentType::ProformaInvoice => PROFORMA_INVOICE,
        DocumentType::PackingList => PACKING_LIST,
        DocumentType::BillOfLading => BILL_OF_LADING,
        DocumentType::AirWaybill => AIR_WAYBILL,
        DocumentType::CertificateOfOrigin => CERTIFICATE_OF_ORIGIN,
        DocumentType::ShippingInstructions => SHIPPING_INSTRUCTIONS,
        DocumentType::InsuranceCertificate => INSURANCE_CERTIFICATE,
        DocumentType::PurchaseOrder => PURCHASE_ORDER,
        DocumentType::DeliveryChallan => DELIVERY_CHALLAN,
        DocumentType::ShippingBill => SHIPPING_BILL,
        DocumentType::CreditNote => CREDIT_NOTE,
        DocumentType::DebitNote => DEBIT_NOTE,
    }
}
